/*!
value.rs - the closed set of argument value kinds.

Every argument declares one `ValueKind`; parsing produces a `Value` tagged
with that kind, and typed reads go through `ArgType`, which is a checked
downcast against the tag.

Kinds:
  String | Int (i32) | Long (i64) | Float (f32) | Double (f64) | Boolean
*/

use serde::Serialize;
use std::fmt;

use crate::error::ParseError;

/* ---- Kind Tag ---- */

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum ValueKind {
    String,
    Int,
    Long,
    Float,
    Double,
    Boolean,
}

impl ValueKind {
    /// Name shown in help text and type errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "String",
            ValueKind::Int => "Int",
            ValueKind::Long => "Long",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::Boolean => "Boolean",
        }
    }

    /// Name used in "is not a valid ..." messages.
    pub fn parse_name(&self) -> &'static str {
        match self {
            ValueKind::Int => "Integer",
            other => other.as_str(),
        }
    }

    /// Fallback default for arguments declared without one.
    pub fn default_value(&self) -> Value {
        match self {
            ValueKind::String => Value::String(String::new()),
            ValueKind::Int => Value::Int(-1),
            ValueKind::Long => Value::Long(-1),
            ValueKind::Float => Value::Float(-1.0),
            ValueKind::Double => Value::Double(-1.0),
            ValueKind::Boolean => Value::Boolean(false),
        }
    }

    /// Convert raw token text into a value of this kind.
    ///
    /// `argument` is only used to label the error.
    pub fn parse(&self, argument: &str, raw: &str) -> Result<Value, ParseError> {
        let fail = || ParseError {
            argument: argument.to_string(),
            raw: raw.to_string(),
            expected: *self,
        };
        let value = match self {
            ValueKind::String => Value::String(raw.to_string()),
            ValueKind::Int => Value::Int(raw.parse::<i32>().map_err(|_| fail())?),
            ValueKind::Long => Value::Long(raw.parse::<i64>().map_err(|_| fail())?),
            ValueKind::Float => Value::Float(raw.parse::<f32>().map_err(|_| fail())?),
            ValueKind::Double => Value::Double(raw.parse::<f64>().map_err(|_| fail())?),
            ValueKind::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                _ => return Err(fail()),
            },
        };
        Ok(value)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/* ---- Tagged Value ---- */

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Int(_) => ValueKind::Int,
            Value::Long(_) => ValueKind::Long,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::Boolean(_) => ValueKind::Boolean,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
        }
    }
}

/* ---- Typed Access ---- */

/// Rust types that can be declared as argument types and read back out of
/// a `Value`.
pub trait ArgType: Sized + 'static {
    const KIND: ValueKind;

    fn from_value(value: &Value) -> Option<Self>;

    fn into_value(self) -> Value;
}

macro_rules! impl_arg_type {
    ($ty:ty, $variant:ident) => {
        impl ArgType for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

impl_arg_type!(String, String);
impl_arg_type!(i32, Int);
impl_arg_type!(i64, Long);
impl_arg_type!(f32, Float);
impl_arg_type!(f64, Double);
impl_arg_type!(bool, Boolean);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_integer() {
        assert_eq!(ValueKind::Int.parse("n", "42").unwrap(), Value::Int(42));
        let err = ValueKind::Int.parse("n", "abc").unwrap_err();
        assert_eq!(err.expected, ValueKind::Int);
        assert_eq!(err.raw, "abc");
    }

    #[test]
    fn numeric_kinds_reject_text() {
        for kind in [
            ValueKind::Int,
            ValueKind::Long,
            ValueKind::Float,
            ValueKind::Double,
        ] {
            assert!(kind.parse("n", "abc").is_err(), "{kind} accepted 'abc'");
        }
    }

    #[test]
    fn boolean_is_case_insensitive() {
        assert_eq!(
            ValueKind::Boolean.parse("b", "TRUE").unwrap(),
            Value::Boolean(true)
        );
        assert!(ValueKind::Boolean.parse("b", "yes").is_err());
    }

    #[test]
    fn downcast_checks_tag() {
        let v = Value::Long(64);
        assert_eq!(i64::from_value(&v), Some(64));
        assert_eq!(i32::from_value(&v), None);
        assert_eq!(String::from_value(&v), None);
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&Value::Double(3.5)).unwrap();
        assert_eq!(json, "3.5");
        let json = serde_json::to_string(&Value::String("a b".into())).unwrap();
        assert_eq!(json, "\"a b\"");
    }
}
