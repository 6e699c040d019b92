//! Evaluate lowered schemas against JSON documents.
//!
//! Mirrors what the generated guard does at runtime (`schema.validate(obj)`),
//! so a declaration's guard can be exercised without a JavaScript engine.
//! Defaults follow the schema library: unknown object keys and empty strings
//! are rejected, `any` accepts `null`, and the first violation wins. Type
//! conversion is on, as it is for `validate` by default: numeric strings pass
//! `number` and `"true"`/`"false"` (any case) pass `boolean`.
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::ir::{Binding, Module, Primitive, Schema};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    #[error("no declaration named `{0}`")]
    UnknownType(String),

    #[error("reference to unknown schema `{0}`")]
    UnknownBinding(String),

    #[error("circular reference through `{0}`")]
    Circular(String),

    #[error("{0}")]
    Violation(Violation),
}

/// First validation failure, labelled the way the schema library labels it.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub label: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" {}", self.label, self.message)
    }
}

pub struct Checker<'m> {
    by_binding: IndexMap<&'m str, &'m Binding>,
    by_type: IndexMap<&'m str, &'m Binding>,
}

#[derive(Clone, Copy)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

fn label(path: &[Segment]) -> String {
    if path.is_empty() {
        return "value".to_string();
    }
    let mut out = String::new();
    for seg in path {
        match seg {
            Segment::Key(k) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(k);
            }
            Segment::Index(i) => out.push_str(&format!("[{i}]")),
        }
    }
    out
}

fn violation(path: &[Segment], message: impl Into<String>) -> CheckError {
    CheckError::Violation(Violation { label: label(path), message: message.into() })
}

impl<'m> Checker<'m> {
    pub fn new(module: &'m Module) -> Self {
        let mut by_binding = IndexMap::new();
        let mut by_type = IndexMap::new();
        for binding in &module.bindings {
            by_binding.insert(binding.name.as_str(), binding);
            by_type.insert(binding.type_name.as_str(), binding);
        }
        Self { by_binding, by_type }
    }

    /// What the guard `is<type_name><suffix>` would answer for `value`.
    pub fn is(&self, type_name: &str, value: &Value) -> Result<bool, CheckError> {
        match self.validate(type_name, value) {
            Ok(()) => Ok(true),
            Err(CheckError::Violation(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// Validate against the binding generated for declaration `type_name`.
    pub fn validate(&self, type_name: &str, value: &Value) -> Result<(), CheckError> {
        let binding = self
            .by_type
            .get(type_name)
            .ok_or_else(|| CheckError::UnknownType(type_name.to_string()))?;
        self.validate_binding(&binding.name, value)
    }

    /// Validate against a binding by its generated (suffixed) name.
    pub fn validate_binding(&self, binding: &str, value: &Value) -> Result<(), CheckError> {
        let mut path = Vec::new();
        let mut chain = Vec::new();
        let target = self.resolve(binding)?;
        chain.push(binding);
        self.check(&target.schema, Some(value), &mut path, &mut chain)
    }

    fn resolve(&self, binding: &str) -> Result<&'m Binding, CheckError> {
        self.by_binding
            .get(binding)
            .copied()
            .ok_or_else(|| CheckError::UnknownBinding(binding.to_string()))
    }

    /// `chain` holds the references followed since the last step into a child
    /// value; meeting the same name twice means the aliases never bottom out.
    fn check<'a>(
        &self,
        schema: &'a Schema,
        value: Option<&'a Value>,
        path: &mut Vec<Segment<'a>>,
        chain: &mut Vec<&'a str>,
    ) -> Result<(), CheckError>
    where
        'm: 'a,
    {
        match schema {
            Schema::Nullable { inner } => match value {
                Some(Value::Null) => Ok(()),
                _ => self.check(inner, value, path, chain),
            },
            Schema::Ref { binding, required } => {
                let Some(value) = value else {
                    return absent(*required, path);
                };
                if chain.contains(&binding.as_str()) {
                    return Err(CheckError::Circular(binding.clone()));
                }
                let target = self.resolve(binding)?;
                chain.push(binding.as_str());
                let result = self.check(&target.schema, Some(value), path, chain);
                chain.pop();
                result
            }
            Schema::Primitive { primitive, required } => {
                let Some(value) = value else {
                    return absent(*required, path);
                };
                check_primitive(*primitive, value, path)
            }
            Schema::StringEnum { values, required } => {
                let Some(value) = value else {
                    return absent(*required, path);
                };
                match value {
                    Value::String(s) if values.iter().any(|v| v == s) => Ok(()),
                    _ => {
                        let quoted = values.iter().map(|v| format!("{v:?}")).collect::<Vec<_>>().join(", ");
                        Err(violation(path, format!("must be one of [{quoted}]")))
                    }
                }
            }
            Schema::Array { item, required } => {
                let Some(value) = value else {
                    return absent(*required, path);
                };
                let Value::Array(elements) = value else {
                    return Err(violation(path, "must be an array"));
                };
                for (i, element) in elements.iter().enumerate() {
                    path.push(Segment::Index(i));
                    let mut fresh = Vec::new();
                    self.check(item, Some(element), path, &mut fresh)?;
                    path.pop();
                }
                Ok(())
            }
            Schema::Object { fields, required } => {
                let Some(value) = value else {
                    return absent(*required, path);
                };
                let Value::Object(map) = value else {
                    return Err(violation(path, "must be of type object"));
                };
                for field in fields {
                    path.push(Segment::Key(&field.name));
                    let mut fresh = Vec::new();
                    self.check(&field.schema, map.get(&field.name), path, &mut fresh)?;
                    path.pop();
                }
                if let Some(key) = map.keys().find(|k| !fields.iter().any(|f| &f.name == *k)) {
                    path.push(Segment::Key(key));
                    return Err(violation(path, "is not allowed"));
                }
                Ok(())
            }
        }
    }
}

fn absent(required: bool, path: &[Segment]) -> Result<(), CheckError> {
    if required {
        Err(violation(path, "is required"))
    } else {
        Ok(())
    }
}

fn is_numeric_string(s: &str) -> bool {
    static NUMERIC: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:e[+-]?\d+)?\s*$").expect("valid regex")
    });
    NUMERIC.is_match(s)
}

fn is_boolean_string(s: &str) -> bool {
    s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
}

fn check_primitive(primitive: Primitive, value: &Value, path: &[Segment]) -> Result<(), CheckError> {
    let ok = match primitive {
        Primitive::Any => true,
        Primitive::Number => value.is_number() || value.as_str().is_some_and(is_numeric_string),
        Primitive::Object => value.is_object(),
        Primitive::Boolean => value.is_boolean() || value.as_str().is_some_and(is_boolean_string),
        Primitive::String => match value {
            Value::String(s) if s.is_empty() => return Err(violation(path, "is not allowed to be empty")),
            other => other.is_string(),
        },
        Primitive::Null => value.is_null(),
        // no JSON value inhabits these
        Primitive::Symbol | Primitive::This | Primitive::Void | Primitive::Undefined | Primitive::Never => false,
    };
    if ok {
        return Ok(());
    }
    let message = match primitive {
        Primitive::Number => "must be a number",
        Primitive::Object => "must be of type object",
        Primitive::Boolean => "must be a boolean",
        Primitive::String => "must be a string",
        Primitive::Null => "must be null",
        Primitive::Symbol => "must be a symbol",
        Primitive::This | Primitive::Void | Primitive::Undefined | Primitive::Never | Primitive::Any => "is not allowed",
    };
    Err(violation(path, message))
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
