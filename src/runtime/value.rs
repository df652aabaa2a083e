use std::{cmp::Ordering, fmt::Display};

use crate::errors::errors::ErrorImpl;

use super::value_type::ValueType;

/// Absolute tolerance used when comparing floats for equality.
pub const FLOAT_TOLERANCE: f32 = 0.001;

/// A runtime value. The tag of a value never changes once constructed.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
    Void,
    Nil,
}

impl Value {
    /// The static type this value inhabits. `Nil` stands in for an absent record
    /// and therefore types as `void`.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Bool(_) => ValueType::Bool,
            Value::String(_) => ValueType::String,
            Value::Void | Value::Nil => ValueType::Void,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Void => "void",
            Value::Nil => "nil",
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_int(&self) -> Result<i32, ErrorImpl> {
        match self {
            Value::Int(value) => Ok(*value),
            _ => Err(self.mismatch("int")),
        }
    }

    pub fn as_float(&self) -> Result<f32, ErrorImpl> {
        match self {
            Value::Float(value) => Ok(*value),
            _ => Err(self.mismatch("float")),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ErrorImpl> {
        match self {
            Value::Bool(value) => Ok(*value),
            _ => Err(self.mismatch("bool")),
        }
    }

    pub fn as_string(&self) -> Result<&str, ErrorImpl> {
        match self {
            Value::String(value) => Ok(value),
            _ => Err(self.mismatch("string")),
        }
    }

    /// Reads an int or a float as a float.
    pub fn as_number(&self) -> Result<f32, ErrorImpl> {
        match self {
            Value::Int(value) => Ok(*value as f32),
            Value::Float(value) => Ok(*value),
            _ => Err(self.mismatch("number")),
        }
    }

    /// Orders two values of the same primitive kind. Strings order by code point.
    /// A NaN float is unordered, so every relation involving it is false.
    pub fn compare(&self, other: &Value) -> Result<Option<Ordering>, ErrorImpl> {
        match (self, other) {
            (Value::Int(left), Value::Int(right)) => Ok(Some(left.cmp(right))),
            (Value::Float(left), Value::Float(right)) => Ok(left.partial_cmp(right)),
            (Value::String(left), Value::String(right)) => Ok(Some(left.cmp(right))),
            (Value::Bool(left), Value::Bool(right)) => Ok(Some(left.cmp(right))),
            _ => Err(self.mismatch(other.kind_name())),
        }
    }

    /// Debug form: strings are quoted with `\n`, `\t`, `\\` and `"` escaped.
    pub fn to_debug_string(&self) -> String {
        match self {
            Value::String(value) => {
                let mut escaped = String::with_capacity(value.len() + 2);
                escaped.push('"');
                for ch in value.chars() {
                    match ch {
                        '\n' => escaped.push_str("\\n"),
                        '\t' => escaped.push_str("\\t"),
                        '\\' => escaped.push_str("\\\\"),
                        '"' => escaped.push_str("\\\""),
                        _ => escaped.push(ch),
                    }
                }
                escaped.push('"');
                escaped
            }
            _ => self.to_string(),
        }
    }

    fn mismatch(&self, expected: &str) -> ErrorImpl {
        ErrorImpl::ValueTypeMismatch {
            expected: String::from(expected),
            received: String::from(self.kind_name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(left), Value::Int(right)) => left == right,
            (Value::Float(left), Value::Float(right)) => (left - right).abs() < FLOAT_TOLERANCE,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Void, Value::Void) | (Value::Nil, Value::Nil) => true,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            // Debug keeps the shortest round-tripping digits and a trailing `.0`
            Value::Float(value) => write!(f, "{:?}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Void => write!(f, "void"),
            Value::Nil => write!(f, "nil"),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(String::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}
