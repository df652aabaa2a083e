use std::{collections::BTreeMap, fmt::Display, rc::Rc};

use super::value::Value;

/// Static type of a value.
///
/// Primitive variants compare by variant. Records compare nominally: two record
/// types are equal only when they are the same declared instance, regardless of
/// their fields.
#[derive(Debug, Clone)]
pub enum ValueType {
    Void,
    Bool,
    String,
    Float,
    Int,
    Record(Rc<RecordType>),
}

#[derive(Debug)]
pub struct RecordType {
    pub name: String,
    pub fields: BTreeMap<String, ValueType>,
}

impl ValueType {
    pub fn record(name: &str, fields: BTreeMap<String, ValueType>) -> ValueType {
        ValueType::Record(Rc::new(RecordType {
            name: String::from(name),
            fields,
        }))
    }

    pub fn name(&self) -> &str {
        match self {
            ValueType::Void => "void",
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::Float => "float",
            ValueType::Int => "int",
            ValueType::Record(record) => &record.name,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Int | ValueType::Float)
    }

    pub fn is_record(&self) -> bool {
        matches!(self, ValueType::Record(_))
    }

    /// Value held by a variable declared with this type but no initializer.
    pub fn default_value(&self) -> Value {
        match self {
            ValueType::Void => Value::Void,
            ValueType::Bool => Value::Bool(false),
            ValueType::String => Value::String(String::new()),
            ValueType::Float => Value::Float(0.0),
            ValueType::Int => Value::Int(0),
            ValueType::Record(_) => Value::Nil,
        }
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueType::Record(left), ValueType::Record(right)) => Rc::ptr_eq(left, right),
            (ValueType::Void, ValueType::Void)
            | (ValueType::Bool, ValueType::Bool)
            | (ValueType::String, ValueType::String)
            | (ValueType::Float, ValueType::Float)
            | (ValueType::Int, ValueType::Int) => true,
            _ => false,
        }
    }
}

impl Eq for ValueType {}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identical types, or Void against a record (an absent record value).
pub fn are_compatible(left: &ValueType, right: &ValueType) -> bool {
    left == right
        || (left.is_record() && *right == ValueType::Void)
        || (*left == ValueType::Void && right.is_record())
}

/// Renders a list of types as `int, float` for diagnostics.
pub fn describe_types(types: &[ValueType]) -> String {
    types
        .iter()
        .map(|ty| ty.name())
        .collect::<Vec<&str>>()
        .join(", ")
}
