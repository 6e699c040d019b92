// Strongly-typed schema IR between lowering and codegen. No source syntax here.

use serde::Serialize;

/// Schema library primitives, named after the TypeScript keyword they come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Any,
    Number,
    Object,
    Boolean,
    String,
    Symbol,
    This,
    Void,
    Undefined,
    Null,
    Never,
}

impl Primitive {
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Any => "any",
            Primitive::Number => "number",
            Primitive::Object => "object",
            Primitive::Boolean => "boolean",
            Primitive::String => "string",
            Primitive::Symbol => "symbol",
            Primitive::This => "this",
            Primitive::Void => "void",
            Primitive::Undefined => "undefined",
            Primitive::Null => "null",
            Primitive::Never => "never",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schema {
    Primitive { primitive: Primitive, required: bool },
    /// `T | null`; never required.
    Nullable { inner: Box<Schema> },
    StringEnum { values: Vec<String>, required: bool },
    Array { item: Box<Schema>, required: bool },
    Object { fields: Vec<Field>, required: bool },
    /// Textual reference to a sibling binding (already suffixed).
    Ref { binding: String, required: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
}

/// One exported schema plus its type guard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    /// `<declaration><suffix>`
    pub name: String,
    /// `is<declaration><suffix>`
    pub guard: String,
    /// Declaration name as written; the guard asserts `types.<type_name>`.
    pub type_name: String,
    pub schema: Schema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub import_path: String,
    pub bindings: Vec<Binding>,
}
