//! Lowering: parsed type expressions → schema IR.
//!
//! This is where the supported subset is decided. Anything outside it is an
//! `UnsupportedConstruct` error; malformed properties are dropped instead.
use crate::error::CompileError;
use crate::ir::{Field, Primitive, Schema};
use crate::syntax::ast::{Keyword, Member, TypeExpr};

/// Immutable per-compilation settings read by every lowering call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context<'a> {
    pub suffix: &'a str,
}

impl<'a> Context<'a> {
    pub fn new(suffix: &'a str) -> Self {
        Self { suffix }
    }

    pub fn binding_name(&self, name: &str) -> String {
        format!("{name}{}", self.suffix)
    }

    pub fn guard_name(&self, name: &str) -> String {
        format!("is{name}{}", self.suffix)
    }
}

fn primitive_of(keyword: Keyword) -> Option<Primitive> {
    Some(match keyword {
        Keyword::Any => Primitive::Any,
        Keyword::Number => Primitive::Number,
        Keyword::Object => Primitive::Object,
        Keyword::Boolean => Primitive::Boolean,
        Keyword::String => Primitive::String,
        Keyword::Symbol => Primitive::Symbol,
        Keyword::This => Primitive::This,
        Keyword::Void => Primitive::Void,
        Keyword::Undefined => Primitive::Undefined,
        Keyword::Null => Primitive::Null,
        Keyword::Never => Primitive::Never,
        Keyword::Unknown | Keyword::BigInt => return None,
    })
}

pub fn lower_type(expr: &TypeExpr, required: bool, cx: &Context) -> Result<Schema, CompileError> {
    match expr {
        TypeExpr::Keyword(keyword) => match primitive_of(*keyword) {
            Some(primitive) => Ok(Schema::Primitive { primitive, required }),
            None => Err(CompileError::unsupported(format!("keyword `{}`", keyword.as_str()))),
        },
        TypeExpr::Union(members) => lower_union(expr, members, required, cx),
        // required-ness belongs to the array field, not to each element
        TypeExpr::Array(element) => Ok(Schema::Array {
            item: Box::new(lower_type(element, false, cx)?),
            required,
        }),
        TypeExpr::Object(members) => Ok(Schema::Object {
            fields: lower_properties(members, cx)?,
            required,
        }),
        TypeExpr::Reference { name, args } => {
            if !args.is_empty() {
                return Err(CompileError::unsupported(format!("generic type reference `{expr}`")));
            }
            let Some(ident) = name.as_identifier() else {
                return Err(CompileError::unsupported(format!("qualified type reference `{name}`")));
            };
            Ok(Schema::Ref { binding: cx.binding_name(ident), required })
        }
        TypeExpr::Literal(_) | TypeExpr::Other { .. } => Err(CompileError::unsupported(format!("{} `{expr}`", expr.kind_name()))),
    }
}

/// Only two union shapes exist in the output: `T | null` and string-literal enums.
fn lower_union(expr: &TypeExpr, members: &[TypeExpr], required: bool, cx: &Context) -> Result<Schema, CompileError> {
    if let [first, second] = members {
        if first.is_null() || second.is_null() {
            let other = if first.is_null() { second } else { first };
            // nullable collapses the required flag: the inner schema is never required
            let inner = lower_type(other, false, cx)?;
            return Ok(Schema::Nullable { inner: Box::new(inner) });
        }
    }
    let literals: Option<Vec<String>> = members
        .iter()
        .map(|m| m.as_string_literal().map(str::to_string))
        .collect();
    match literals {
        Some(values) => Ok(Schema::StringEnum { values, required }),
        None => Err(CompileError::unsupported(format!(
            "union `{expr}` (only `T | null` and unions of string literals are supported)"
        ))),
    }
}

/// Fields of an object literal or interface body, in source order. Members
/// without a plain identifier name or without a type annotation are dropped.
pub fn lower_properties(members: &[Member], cx: &Context) -> Result<Vec<Field>, CompileError> {
    members
        .iter()
        .filter_map(|member| match member {
            Member::Property(p) => Some((p.name.as_identifier()?, p.ty.as_ref()?, p.optional)),
            _ => None,
        })
        .map(|(name, ty, optional)| {
            Ok(Field { name: name.to_string(), schema: lower_type(ty, !optional, cx)? })
        })
        .collect()
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
