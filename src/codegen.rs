//! Codegen: schema IR → Joi source text.
//!
//! Rendering is pure and infallible; every unsupported shape has already been
//! rejected during lowering. Output is byte-for-byte deterministic.
use crate::error::CompileError;
use crate::ir::{Binding, Field, Module, Schema};
use crate::lower::{lower_properties, lower_type, Context};
use crate::syntax::ast::{Member, TypeExpr};

pub const HEADER_COMMENT: &str = "// This file was generated by ts-joi-gen. Do not edit it by hand.";
pub const SCHEMA_LIBRARY: &str = "joi";

const INDENT: &str = "  ";

fn required_suffix(required: bool) -> &'static str {
    if required { ".required()" } else { "" }
}

/// JavaScript string literal for `s`.
fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// Render one schema. `indent` is the nesting level of the line the expression starts on.
pub fn render_schema(schema: &Schema, indent: usize) -> String {
    match schema {
        Schema::Primitive { primitive, required } => {
            format!("Joi.{}(){}", primitive.keyword(), required_suffix(*required))
        }
        Schema::Nullable { inner } => format!("{}.allow(null)", render_schema(inner, indent)),
        Schema::StringEnum { values, required } => {
            let values = values.iter().map(|v| quote(v)).collect::<Vec<_>>().join(", ");
            format!("Joi.string().valid({values}){}", required_suffix(*required))
        }
        Schema::Array { item, required } => {
            format!("Joi.array().items({}){}", render_schema(item, indent), required_suffix(*required))
        }
        Schema::Object { fields, required } => {
            format!("{}{}", render_fields(fields, indent), required_suffix(*required))
        }
        Schema::Ref { binding, required } => format!("{binding}{}", required_suffix(*required)),
    }
}

/// `Joi.object({ ... })` with one field per line, closing brace back at `indent`.
pub fn render_fields(fields: &[Field], indent: usize) -> String {
    if fields.is_empty() {
        return "Joi.object({})".to_string();
    }
    let pad = INDENT.repeat(indent + 1);
    let body = fields
        .iter()
        .map(|f| format!("{pad}{}: {}", f.name, render_schema(&f.schema, indent + 1)))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("Joi.object({{\n{body}\n{}}})", INDENT.repeat(indent))
}

/// Type-expression renderer: lower then render.
pub fn render_type(expr: &TypeExpr, required: bool, indent: usize, cx: &Context) -> Result<String, CompileError> {
    Ok(render_schema(&lower_type(expr, required, cx)?, indent))
}

/// Property-list renderer: lower then render.
pub fn render_properties(members: &[Member], indent: usize, cx: &Context) -> Result<String, CompileError> {
    Ok(render_fields(&lower_properties(members, cx)?, indent))
}

/// Import path of the original type module: `label` without its source
/// extension, made relative when it is a bare name.
pub fn import_path(label: &str) -> String {
    use once_cell::sync::Lazy;
    use regex::Regex;
    static SOURCE_EXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\.d)?\.tsx?$").expect("valid regex"));

    let stem = SOURCE_EXT.replace(label, "");
    if stem.starts_with('.') || stem.starts_with('/') {
        stem.into_owned()
    } else {
        format!("./{stem}")
    }
}

// ————————————————————————————————————————————————————————————————————————————
// MODULE WRITER
// ————————————————————————————————————————————————————————————————————————————

pub struct Codegen {
    out: String,
}

impl Codegen {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    pub fn emit_header(&mut self, import_path: &str) {
        self.out.push_str(HEADER_COMMENT);
        self.out.push('\n');
        self.out.push_str(&format!("import * as Joi from {}\n", quote(SCHEMA_LIBRARY)));
        self.out.push_str(&format!("import * as types from {}\n", quote(import_path)));
    }

    /// Schema binding plus type guard, preceded by a blank line.
    pub fn emit_binding(&mut self, binding: &Binding) {
        let Binding { name, guard, type_name, schema } = binding;
        self.out.push('\n');
        self.out.push_str(&format!("export const {name} = {}\n", render_schema(schema, 0)));
        self.out.push('\n');
        self.out.push_str(&format!("export function {guard}(obj: any): obj is types.{type_name} {{\n"));
        self.out.push_str(&format!("{INDENT}return {name}.validate(obj).error === undefined\n"));
        self.out.push_str("}\n");
    }

    pub fn emit(&mut self, module: &Module) {
        self.emit_header(&module.import_path);
        for binding in &module.bindings {
            self.emit_binding(binding);
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_type;
    use pretty_assertions::assert_eq;

    fn render(src: &str, required: bool, suffix: &str) -> String {
        let ty = parse_type(src).unwrap();
        render_type(&ty, required, 0, &Context::new(suffix)).unwrap()
    }

    #[test]
    fn primitives_and_required_marker() {
        for kw in ["any", "number", "object", "boolean", "string", "symbol", "this", "void", "undefined", "null", "never"] {
            assert_eq!(render(kw, true, ""), format!("Joi.{kw}().required()"));
            assert_eq!(render(kw, false, ""), format!("Joi.{kw}()"));
        }
    }

    #[test]
    fn nullable_is_inner_plus_allow_null() {
        assert_eq!(render("number | null", true, ""), "Joi.number().allow(null)");
        assert_eq!(render("string[] | null", true, ""), "Joi.array().items(Joi.string()).allow(null)");
        assert_eq!(render("Foo | null", true, "V"), "FooV.allow(null)");
    }

    #[test]
    fn string_enums_are_quoted_in_order() {
        assert_eq!(render(r#""a" | "b" | "c""#, true, ""), r#"Joi.string().valid("a", "b", "c").required()"#);
        assert_eq!(render(r#""c" | "a""#, false, ""), r#"Joi.string().valid("c", "a")"#);
        assert_eq!(render(r#"'say "hi"' | 'x'"#, false, ""), r#"Joi.string().valid("say \"hi\"", "x")"#);
    }

    #[test]
    fn arrays_and_references() {
        assert_eq!(render("string[]", true, ""), "Joi.array().items(Joi.string()).required()");
        assert_eq!(render("Foo[][]", false, "Schema"), "Joi.array().items(Joi.array().items(FooSchema))");
        assert_eq!(render("Foo", true, ""), "Foo.required()");
    }

    #[test]
    fn nested_objects_are_indented_two_spaces_per_level() {
        let src = "{ a: string; inner?: { b: number[]; deep: { c: boolean } }; list: { d: any }[] }";
        assert_eq!(render(src, true, ""), [
            "Joi.object({",
            "  a: Joi.string().required(),",
            "  inner: Joi.object({",
            "    b: Joi.array().items(Joi.number()).required(),",
            "    deep: Joi.object({",
            "      c: Joi.boolean().required()",
            "    }).required()",
            "  }),",
            "  list: Joi.array().items(Joi.object({",
            "    d: Joi.any().required()",
            "  })).required()",
            "}).required()",
        ].join("\n"));
    }

    #[test]
    fn empty_object_literal() {
        assert_eq!(render("{}", false, ""), "Joi.object({})");
        assert_eq!(render("{ m(): void }", true, ""), "Joi.object({}).required()");
    }

    #[test]
    fn render_properties_at_depth() {
        let TypeExpr::Object(members) = parse_type("{ a?: string }").unwrap() else {
            panic!("expected an object literal");
        };
        let text = render_properties(&members, 2, &Context::default()).unwrap();
        assert_eq!(text, "Joi.object({\n      a: Joi.string()\n    })");
    }

    #[test]
    fn import_path_strips_source_extensions() {
        assert_eq!(import_path("input"), "./input");
        assert_eq!(import_path("types.ts"), "./types");
        assert_eq!(import_path("types.d.ts"), "./types");
        assert_eq!(import_path("view.tsx"), "./view");
        assert_eq!(import_path("../shared/model.ts"), "../shared/model");
        assert_eq!(import_path("/abs/model.ts"), "/abs/model");
        assert_eq!(import_path("model.ts.bak"), "./model.ts.bak");
    }

    #[test]
    fn binding_and_guard_shape() {
        let mut cg = Codegen::new();
        cg.emit(&Module {
            import_path: "./model".into(),
            bindings: vec![Binding {
                name: "FooV".into(),
                guard: "isFooV".into(),
                type_name: "Foo".into(),
                schema: Schema::Primitive { primitive: crate::ir::Primitive::String, required: false },
            }],
        });
        assert_eq!(cg.into_string(), [
            HEADER_COMMENT,
            "import * as Joi from \"joi\"",
            "import * as types from \"./model\"",
            "",
            "export const FooV = Joi.string()",
            "",
            "export function isFooV(obj: any): obj is types.Foo {",
            "  return FooV.validate(obj).error === undefined",
            "}",
            "",
        ].join("\n"));
    }
}
