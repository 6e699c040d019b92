//! Declarations and type expressions the compiler reads.
//!
//! Shapes the compiler can lower have their own variants. Everything else the
//! parser accepts is kept as [`TypeExpr::Other`] with its source text, so
//! diagnostics can quote it. `Display` prints a type back in TypeScript notation.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    /// Any other top-level statement: class, function, variable, enum, import...
    Other(OtherDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub type_params: Vec<String>,
    /// Heritage clauses as written (`Base<T>`).
    pub extends: Vec<String>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OtherDecl {
    /// Leading keyword (`class`, `const`, ...) or `statement` for expressions.
    pub kind: &'static str,
    pub line: usize,
}

// ————————————————————————————————————————————————————————————————————————————
// MEMBERS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Property(PropertySignature),
    /// Methods, getters and setters.
    Method(PropertyName),
    IndexSignature,
    CallSignature,
    ConstructSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySignature {
    pub name: PropertyName,
    pub optional: bool,
    /// `None` when the annotation is missing (`a;` or `a?;`).
    pub ty: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyName {
    Identifier(String),
    String(String),
    Number(String),
    Computed,
}

impl PropertyName {
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            PropertyName::Identifier(s) => Some(s),
            _ => None,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Any,
    Unknown,
    Number,
    BigInt,
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

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::Number => "number",
            Keyword::BigInt => "bigint",
            Keyword::Object => "object",
            Keyword::Boolean => "boolean",
            Keyword::String => "string",
            Keyword::Symbol => "symbol",
            Keyword::This => "this",
            Keyword::Void => "void",
            Keyword::Undefined => "undefined",
            Keyword::Null => "null",
            Keyword::Never => "never",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(String),
    Boolean(bool),
}

/// Dotted name: `Foo` or `ns.Foo`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityName(pub Vec<String>);

impl EntityName {
    pub fn as_identifier(&self) -> Option<&str> {
        match self.0.as_slice() {
            [single] => Some(single),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Keyword(Keyword),
    Literal(Literal),
    Union(Vec<TypeExpr>),
    Array(Box<TypeExpr>),
    Object(Vec<Member>),
    Reference { name: EntityName, args: Vec<TypeExpr> },
    /// Intersections, tuples, function types, mapped types and the rest.
    Other { kind: &'static str, text: String },
}

impl TypeExpr {
    pub fn is_null(&self) -> bool {
        matches!(self, TypeExpr::Keyword(Keyword::Null))
    }

    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            TypeExpr::Literal(Literal::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Name of the construct, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeExpr::Keyword(_) => "keyword",
            TypeExpr::Literal(_) => "literal type",
            TypeExpr::Union(_) => "union",
            TypeExpr::Array(_) => "array",
            TypeExpr::Object(_) => "object literal",
            TypeExpr::Reference { .. } => "type reference",
            TypeExpr::Other { kind, .. } => kind,
        }
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

fn join(f: &mut fmt::Formatter<'_>, items: &[TypeExpr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Keyword(k) => f.write_str(k.as_str()),
            TypeExpr::Literal(Literal::String(s)) => write!(f, "{s:?}"),
            TypeExpr::Literal(Literal::Number(n)) => f.write_str(n),
            TypeExpr::Literal(Literal::Boolean(b)) => write!(f, "{b}"),
            TypeExpr::Union(xs) => join(f, xs, " | "),
            TypeExpr::Array(el) => match el.as_ref() {
                TypeExpr::Union(_) | TypeExpr::Other { .. } => write!(f, "({el})[]"),
                _ => write!(f, "{el}[]"),
            },
            TypeExpr::Object(members) => {
                if members.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for m in members {
                    match m {
                        Member::Property(p) => {
                            match &p.name {
                                PropertyName::Identifier(s) | PropertyName::Number(s) => f.write_str(s)?,
                                PropertyName::String(s) => write!(f, "{s:?}")?,
                                PropertyName::Computed => f.write_str("[…]")?,
                            }
                            if p.optional {
                                f.write_str("?")?;
                            }
                            if let Some(ty) = &p.ty {
                                write!(f, ": {ty}")?;
                            }
                        }
                        Member::Method(_) => f.write_str("method(…)")?,
                        Member::IndexSignature => f.write_str("[…]: …")?,
                        Member::CallSignature => f.write_str("(…): …")?,
                        Member::ConstructSignature => f.write_str("new (…): …")?,
                    }
                    f.write_str("; ")?;
                }
                f.write_str("}")
            }
            TypeExpr::Reference { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    join(f, args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeExpr::Other { text, .. } => f.write_str(text),
        }
    }
}
