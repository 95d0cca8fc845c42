//! Scalar values accepted by the cache

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Str(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl StoreValue {
    /// Bytes as the store keeps them; numbers are written as decimal text.
    /// Floats always carry a fractional part, so `1.0` stays `"1.0"`.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            StoreValue::Str(s) => s.as_bytes().to_vec(),
            StoreValue::Bytes(b) => b.clone(),
            StoreValue::Int(n) => n.to_string().into_bytes(),
            StoreValue::Float(n) => format!("{:?}", n).into_bytes(),
        }
    }

    /// Source-literal form, used when recording call inputs.
    pub fn literal(&self) -> String {
        match self {
            StoreValue::Str(s) => format!("{:?}", s),
            StoreValue::Bytes(b) => format!("b\"{}\"", b.escape_ascii()),
            StoreValue::Int(n) => n.to_string(),
            StoreValue::Float(n) => format!("{:?}", n),
        }
    }
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal())
    }
}

impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        StoreValue::Str(value.to_string())
    }
}

impl From<String> for StoreValue {
    fn from(value: String) -> Self {
        StoreValue::Str(value)
    }
}

impl From<&[u8]> for StoreValue {
    fn from(value: &[u8]) -> Self {
        StoreValue::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for StoreValue {
    fn from(value: Vec<u8>) -> Self {
        StoreValue::Bytes(value)
    }
}

impl From<i64> for StoreValue {
    fn from(value: i64) -> Self {
        StoreValue::Int(value)
    }
}

impl From<i32> for StoreValue {
    fn from(value: i32) -> Self {
        StoreValue::Int(i64::from(value))
    }
}

impl From<f64> for StoreValue {
    fn from(value: f64) -> Self {
        StoreValue::Float(value)
    }
}
