//! Value type definitions for parameter binding.
//!
//! Every parameter declares a [`ValueType`]. Raw command-line tokens are
//! converted into a [`Value`] by [`ValueType::parse`], and typed handles read
//! the value back through the [`ParamValue`] trait.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Declared type of a parameter value.
///
/// # Examples
///
/// ```
/// use verbtree_core::{Value, ValueType};
///
/// assert_eq!(ValueType::Int32.parse("42").unwrap(), Value::Int(42));
/// assert!(ValueType::UInt16.parse("70000").is_err());
///
/// let format = ValueType::Choice(vec!["json".into(), "yaml".into()]);
/// assert_eq!(format.parse("yaml").unwrap(), Value::Str("yaml".into()));
/// assert!(format.parse("toml").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueType {
    /// `true` / `false` (case-insensitive).
    Bool,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 16-bit integer (ports and the like).
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// Double precision float.
    Float,
    /// Free-form text (the default).
    #[default]
    String,
    /// File system path, taken verbatim.
    Path,
    /// One of a fixed set of strings (case-sensitive).
    Choice(Vec<String>),
}

/// A converted parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Path(PathBuf),
}

/// Why a raw token could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueParseError {
    /// Human-readable reason, e.g. "expected an integer".
    pub reason: String,
}

impl fmt::Display for ValueParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ValueParseError {}

impl ValueType {
    /// Converts a raw token into a [`Value`] of this type.
    ///
    /// Numbers follow Rust's `FromStr` rules and are range-checked against
    /// the declared width.
    pub fn parse(&self, raw: &str) -> Result<Value, ValueParseError> {
        let fail = |reason: &str| ValueParseError {
            reason: reason.to_string(),
        };

        match self {
            ValueType::Bool => {
                if raw.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(fail("expected true or false"))
                }
            }
            ValueType::Int32 => raw
                .parse::<i32>()
                .map(|n| Value::Int(i64::from(n)))
                .map_err(|_| fail("expected a 32-bit integer")),
            ValueType::Int64 => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| fail("expected a 64-bit integer")),
            ValueType::UInt16 => raw
                .parse::<u16>()
                .map(|n| Value::UInt(u64::from(n)))
                .map_err(|_| fail("expected an integer between 0 and 65535")),
            ValueType::UInt32 => raw
                .parse::<u32>()
                .map(|n| Value::UInt(u64::from(n)))
                .map_err(|_| fail("expected a non-negative 32-bit integer")),
            ValueType::UInt64 => raw
                .parse::<u64>()
                .map(Value::UInt)
                .map_err(|_| fail("expected a non-negative integer")),
            ValueType::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| fail("expected a number")),
            ValueType::String => Ok(Value::Str(raw.to_string())),
            ValueType::Path => Ok(Value::Path(PathBuf::from(raw))),
            ValueType::Choice(choices) => {
                if choices.iter().any(|c| c == raw) {
                    Ok(Value::Str(raw.to_string()))
                } else {
                    Err(ValueParseError {
                        reason: format!("expected one of: {}", choices.join(", ")),
                    })
                }
            }
        }
    }

    /// Short placeholder used in help output (e.g. `<int>`).
    pub fn placeholder(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int32 | ValueType::Int64 => "int",
            ValueType::UInt16 | ValueType::UInt32 | ValueType::UInt64 => "uint",
            ValueType::Float => "number",
            ValueType::String => "text",
            ValueType::Path => "path",
            ValueType::Choice(_) => "choice",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::UInt(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Rust types that can be declared as parameter values.
///
/// # Examples
///
/// ```
/// use verbtree_core::{ParamValue, Value, ValueType};
///
/// assert_eq!(<u16 as ParamValue>::value_type(), ValueType::UInt16);
/// assert_eq!(u16::from_value(&Value::UInt(8080)), Some(8080));
/// assert_eq!(u16::from_value(&Value::Str("x".into())), None);
/// ```
pub trait ParamValue: Sized {
    /// The declared type used for conversion.
    fn value_type() -> ValueType;
    /// Reads a converted value back; `None` on a type mismatch.
    fn from_value(value: &Value) -> Option<Self>;
    /// Wraps a Rust value (used for defaults).
    fn into_value(self) -> Value;
}

impl ParamValue for bool {
    fn value_type() -> ValueType {
        ValueType::Bool
    }
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! signed_param_value {
    ($ty:ty, $vt:expr) => {
        impl ParamValue for $ty {
            fn value_type() -> ValueType {
                $vt
            }
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Int(n) => <$ty>::try_from(*n).ok(),
                    _ => None,
                }
            }
            fn into_value(self) -> Value {
                Value::Int(i64::from(self))
            }
        }
    };
}

macro_rules! unsigned_param_value {
    ($ty:ty, $vt:expr) => {
        impl ParamValue for $ty {
            fn value_type() -> ValueType {
                $vt
            }
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::UInt(n) => <$ty>::try_from(*n).ok(),
                    _ => None,
                }
            }
            fn into_value(self) -> Value {
                Value::UInt(u64::from(self))
            }
        }
    };
}

signed_param_value!(i32, ValueType::Int32);
signed_param_value!(i64, ValueType::Int64);
unsigned_param_value!(u16, ValueType::UInt16);
unsigned_param_value!(u32, ValueType::UInt32);
unsigned_param_value!(u64, ValueType::UInt64);

impl ParamValue for usize {
    fn value_type() -> ValueType {
        ValueType::UInt64
    }
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::UInt(n) => usize::try_from(*n).ok(),
            _ => None,
        }
    }
    fn into_value(self) -> Value {
        Value::UInt(self as u64)
    }
}

impl ParamValue for f64 {
    fn value_type() -> ValueType {
        ValueType::Float
    }
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl ParamValue for String {
    fn value_type() -> ValueType {
        ValueType::String
    }
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            Value::Path(p) => Some(p.display().to_string()),
            _ => None,
        }
    }
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl ParamValue for PathBuf {
    fn value_type() -> ValueType {
        ValueType::Path
    }
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Path(p) => Some(p.clone()),
            Value::Str(s) => Some(PathBuf::from(s)),
            _ => None,
        }
    }
    fn into_value(self) -> Value {
        Value::Path(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_parse_is_case_insensitive() {
        assert_eq!(ValueType::Bool.parse("TRUE").unwrap(), Value::Bool(true));
        assert_eq!(ValueType::Bool.parse("False").unwrap(), Value::Bool(false));
        assert!(ValueType::Bool.parse("yes").is_err());
    }

    #[test]
    fn test_integer_widths_are_range_checked() {
        assert!(ValueType::Int32.parse("2147483648").is_err());
        assert_eq!(
            ValueType::Int64.parse("2147483648").unwrap(),
            Value::Int(2_147_483_648)
        );
        assert_eq!(ValueType::Int32.parse("-7").unwrap(), Value::Int(-7));
        assert!(ValueType::UInt32.parse("-7").is_err());
    }

    #[test]
    fn test_choice_reports_allowed_values() {
        let vt = ValueType::Choice(vec!["json".into(), "yaml".into()]);
        let err = vt.parse("xml").unwrap_err();
        assert_eq!(err.reason, "expected one of: json, yaml");
    }

    #[test]
    fn test_string_reads_path_values() {
        let value = ValueType::Path.parse("/tmp/out").unwrap();
        assert_eq!(String::from_value(&value).as_deref(), Some("/tmp/out"));
        assert_eq!(
            PathBuf::from_value(&value),
            Some(PathBuf::from("/tmp/out"))
        );
    }

    #[test]
    fn test_typed_read_rejects_mismatch() {
        assert_eq!(i32::from_value(&Value::UInt(3)), None);
        assert_eq!(bool::from_value(&Value::Str("true".into())), None);
        assert_eq!(u16::from_value(&Value::UInt(70_000)), None);
    }
}
