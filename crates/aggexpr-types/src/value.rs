//! Runtime values and declared data types

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Declared type of an expression or a data item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    #[default]
    Numeric,
    Text,
    Boolean,
    /// ISO date, carried and compared as text
    Date,
}

impl DataType {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Numeric => "NUMERIC",
            Self::Text => "TEXT",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
        }
    }

    /// Text and dates share a representation
    pub const fn is_text_like(&self) -> bool {
        matches!(self, Self::Text | Self::Date)
    }

    /// Whether values of the two types can be compared with each other
    pub const fn is_compatible_with(&self, other: DataType) -> bool {
        match (self, other) {
            (Self::Numeric, DataType::Numeric) | (Self::Boolean, DataType::Boolean) => true,
            (Self::Text | Self::Date, DataType::Text | DataType::Date) => true,
            _ => false,
        }
    }

    /// Substitute for an absent item of this type
    pub fn default_value(&self) -> Value {
        match self {
            Self::Numeric => Value::Number(0.0),
            Self::Text | Self::Date => Value::Text(String::new()),
            Self::Boolean => Value::Boolean(false),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NUMERIC" | "NUMBER" => Ok(Self::Numeric),
            "TEXT" | "STRING" => Ok(Self::Text),
            "BOOLEAN" => Ok(Self::Boolean),
            "DATE" => Ok(Self::Date),
            other => Err(format!("unknown data type '{}'", other)),
        }
    }
}

/// Result of evaluating an expression, or the value of a data item
///
/// `Null` is the "no value" outcome of the missing-value strategies; it is
/// never an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Type of a present value
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Number(_) => Some(DataType::Numeric),
            Self::Text(_) => Some(DataType::Text),
            Self::Boolean(_) => Some(DataType::Boolean),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Boolean(_) => "boolean",
        }
    }

    /// Ordering between two present values of the same type.
    /// Strings compare lexicographically, `false < true`.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
