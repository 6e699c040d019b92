//! Declaration compiler and module driver.
//!
//! Compilation is all or nothing. A generic declaration (`interface Box<T>`,
//! `type Id<T> = ...`) or an interface with an `extends` clause is an
//! `UnsupportedConstruct` error and aborts the whole file, the same as any
//! unsupported type expression.
use crate::codegen::{import_path, Codegen};
use crate::error::CompileError;
use crate::ir::{Binding, Module, Schema};
use crate::lower::{lower_properties, lower_type, Context};
use crate::syntax::ast::Declaration;
use crate::syntax::parse_module;

/// Import label used when the input has no meaningful file name (stdin).
pub const DEFAULT_INPUT_LABEL: &str = "input";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Appended to every generated binding and guard name.
    pub suffix: String,
    /// Logical name of the source module; the types import path is derived from it.
    pub input_label: String,
}

impl Default for Options {
    fn default() -> Self {
        Self { suffix: String::new(), input_label: DEFAULT_INPUT_LABEL.to_string() }
    }
}

impl Options {
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_input_label(mut self, label: impl Into<String>) -> Self {
        self.input_label = label.into();
        self
    }
}

/// Compile one top-level declaration. `Ok(None)` means the declaration kind
/// produces no output, which is not an error.
pub fn compile_declaration(decl: &Declaration, cx: &Context) -> Result<Option<Binding>, CompileError> {
    let (name, type_params) = match decl {
        Declaration::Interface(iface) => (&iface.name, &iface.type_params),
        Declaration::TypeAlias(alias) => (&alias.name, &alias.type_params),
        Declaration::Other(_) => return Ok(None),
    };
    if !type_params.is_empty() {
        return Err(CompileError::unsupported(format!(
            "generic declaration `{name}<{}>`", type_params.join(", ")
        )));
    }
    let schema = match decl {
        Declaration::Interface(iface) => {
            if !iface.extends.is_empty() {
                let bases = iface.extends.join(", ");
                return Err(CompileError::unsupported(format!(
                    "interface `{name}` extends `{bases}` (inheritance)"
                )));
            }
            Schema::Object { fields: lower_properties(&iface.members, cx)?, required: false }
        }
        Declaration::TypeAlias(alias) => lower_type(&alias.ty, false, cx)?,
        Declaration::Other(_) => return Ok(None),
    };
    tracing::trace!(name = %name, "compiled declaration");
    Ok(Some(Binding {
        name: cx.binding_name(name),
        guard: cx.guard_name(name),
        type_name: name.clone(),
        schema,
    }))
}

/// Parse and lower a whole module. The first error aborts the compilation.
pub fn compile_ir(source: &str, options: &Options) -> Result<Module, CompileError> {
    let cx = Context::new(&options.suffix);
    let mut bindings = Vec::new();
    for decl in parse_module(source)? {
        if let Some(binding) = compile_declaration(&decl, &cx)? {
            bindings.push(binding);
        }
    }
    Ok(Module { import_path: import_path(&options.input_label), bindings })
}

/// Compile source text to the generated schema module.
pub fn compile_module(source: &str, options: &Options) -> Result<String, CompileError> {
    let module = compile_ir(source, options)?;
    let mut cg = Codegen::new();
    cg.emit(&module);
    Ok(cg.into_string())
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::HEADER_COMMENT;
    use pretty_assertions::assert_eq;

    fn header(path: &str) -> String {
        format!("{HEADER_COMMENT}\nimport * as Joi from \"joi\"\nimport * as types from \"{path}\"\n")
    }

    #[test]
    fn interface_with_optional_field() {
        let out = compile_module("interface Foo { a: string; b?: number }", &Options::default()).unwrap();
        assert_eq!(out, header("./input") + "
export const Foo = Joi.object({
  a: Joi.string().required(),
  b: Joi.number()
})

export function isFoo(obj: any): obj is types.Foo {
  return Foo.validate(obj).error === undefined
}
");
    }

    #[test]
    fn type_alias_and_suffix() {
        let options = Options::default().with_suffix("Schema").with_input_label("model.ts");
        let out = compile_module("export type Bar = string[];\nexport interface Foo { bar: Bar }", &options).unwrap();
        assert_eq!(out, header("./model") + "
export const BarSchema = Joi.array().items(Joi.string())

export function isBarSchema(obj: any): obj is types.Bar {
  return BarSchema.validate(obj).error === undefined
}

export const FooSchema = Joi.object({
  bar: BarSchema.required()
})

export function isFooSchema(obj: any): obj is types.Foo {
  return FooSchema.validate(obj).error === undefined
}
");
    }

    #[test]
    fn other_declarations_produce_nothing() {
        let src = "class A {}\nfunction f() {}\nconst c = 1;\nenum E { X }";
        assert_eq!(compile_module(src, &Options::default()).unwrap(), header("./input"));
        assert_eq!(compile_module("", &Options::default()).unwrap(), header("./input"));
    }

    #[test]
    fn property_order_is_preserved_and_malformed_fields_dropped() {
        let module = compile_ir("interface P { z: number; a; 'b-c': string; y?: boolean; m(): void }", &Options::default()).unwrap();
        let Schema::Object { fields, .. } = &module.bindings[0].schema else { panic!() };
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["z", "y"]);
    }

    #[test]
    fn one_unsupported_declaration_fails_the_whole_module() {
        let src = "interface Ok { a: string }\ntype Bad = number | boolean;";
        let err = compile_module(src, &Options::default()).unwrap_err();
        assert!(err.is_unsupported(), "{err}");
        assert!(err.to_string().contains("number | boolean"), "{err}");
    }

    #[test]
    fn syntax_errors_propagate() {
        let err = compile_module("interface Foo { a: }", &Options::default()).unwrap_err();
        assert!(matches!(err, CompileError::Syntax(_)), "{err}");
    }

    #[test]
    fn generics_and_inheritance_are_rejected() {
        for src in ["interface Box<T> { value: T }", "type Id<T> = T", "interface B extends A { b: string }"] {
            let err = compile_module(src, &Options::default()).unwrap_err();
            assert!(err.is_unsupported(), "{src}: {err}");
        }
    }

    #[test]
    fn inheritance_aborts_the_file_naming_the_base() {
        let src = "interface A { a: string }\ninterface B extends A { b: string }";
        let err = compile_module(src, &Options::default()).unwrap_err();
        assert_eq!(err, CompileError::UnsupportedConstruct("interface `B` extends `A` (inheritance)".into()));
    }

    #[test]
    fn regex_literals_in_skipped_statements() {
        let src = "const OPEN = /[{]/;\nconst APOS = /it's/;\ninterface Foo { a: string }";
        let out = compile_module(src, &Options::default()).unwrap();
        assert!(out.contains("export const Foo = Joi.object({\n  a: Joi.string().required()\n})\n"), "{out}");
        assert!(out.contains("export function isFoo(obj: any): obj is types.Foo {"), "{out}");
    }

    #[test]
    fn guard_asserts_the_unsuffixed_type() {
        let cx = Context::new("V");
        let decls = parse_module("interface Foo { a: string }").unwrap();
        let binding = compile_declaration(&decls[0], &cx).unwrap().unwrap();
        assert_eq!(binding.name, "FooV");
        assert_eq!(binding.guard, "isFooV");
        assert_eq!(binding.type_name, "Foo");
    }

    #[test]
    fn compilation_is_deterministic() {
        let src = "interface A { s: 'x' | 'y'; n: number | null; list: { k: string }[] }\ntype B = A[]";
        let options = Options::default().with_suffix("T");
        assert_eq!(compile_module(src, &options).unwrap(), compile_module(src, &options).unwrap());
    }
}
