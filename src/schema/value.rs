use std::fmt;

use serde::{Serialize, Serializer};

/// Type of the value that a field can take.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum Type {
    /// `&str`
    Str = b's',
    /// `u64`
    U64 = b'u',
    /// `i64`
    I64 = b'i',
    /// `f64`
    F64 = b'f',
    /// `bool`
    Bool = b'o',
}

impl Type {
    /// Returns true iff the type is a numerical type, i.e. `u64`, `i64` or `f64`.
    pub fn is_numeric(self) -> bool {
        matches!(self, Type::U64 | Type::I64 | Type::F64)
    }

    /// Returns a human readable name for the type.
    pub fn name(self) -> &'static str {
        match self {
            Type::Str => "Str",
            Type::U64 => "U64",
            Type::I64 => "I64",
            Type::F64 => "F64",
            Type::Bool => "Bool",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of a field, owned by the document holding it.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedValue {
    /// The str type is used for any text information.
    Str(String),
    /// Unsigned 64-bits Integer `u64`
    U64(u64),
    /// Signed 64-bits Integer `i64`
    I64(i64),
    /// 64-bits Float `f64`
    F64(f64),
    /// Bool value
    Bool(bool),
}

impl OwnedValue {
    /// Returns the [`Type`] of the value.
    pub fn value_type(&self) -> Type {
        match self {
            OwnedValue::Str(_) => Type::Str,
            OwnedValue::U64(_) => Type::U64,
            OwnedValue::I64(_) => Type::I64,
            OwnedValue::F64(_) => Type::F64,
            OwnedValue::Bool(_) => Type::Bool,
        }
    }

    /// Returns the text value, provided the value is of the `Str` type.
    pub fn as_str(&self) -> Option<&str> {
        if let OwnedValue::Str(text) = self {
            Some(text)
        } else {
            None
        }
    }

    /// Returns the value as a `f64`, provided the value is numeric.
    ///
    /// Integers beyond 2^53 lose precision.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            OwnedValue::U64(val) => Some(val as f64),
            OwnedValue::I64(val) => Some(val as f64),
            OwnedValue::F64(val) => Some(val),
            OwnedValue::Str(_) | OwnedValue::Bool(_) => None,
        }
    }
}

impl Serialize for OwnedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        match *self {
            OwnedValue::Str(ref v) => serializer.serialize_str(v),
            OwnedValue::U64(u) => serializer.serialize_u64(u),
            OwnedValue::I64(u) => serializer.serialize_i64(u),
            OwnedValue::F64(u) => serializer.serialize_f64(u),
            OwnedValue::Bool(b) => serializer.serialize_bool(b),
        }
    }
}

impl From<String> for OwnedValue {
    fn from(s: String) -> OwnedValue {
        OwnedValue::Str(s)
    }
}

impl From<&str> for OwnedValue {
    fn from(s: &str) -> OwnedValue {
        OwnedValue::Str(s.to_string())
    }
}

impl From<u64> for OwnedValue {
    fn from(v: u64) -> OwnedValue {
        OwnedValue::U64(v)
    }
}

impl From<i64> for OwnedValue {
    fn from(v: i64) -> OwnedValue {
        OwnedValue::I64(v)
    }
}

impl From<f64> for OwnedValue {
    fn from(v: f64) -> OwnedValue {
        OwnedValue::F64(v)
    }
}

impl From<bool> for OwnedValue {
    fn from(b: bool) -> OwnedValue {
        OwnedValue::Bool(b)
    }
}
