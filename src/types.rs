use std::fmt;

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

/// Storage class of a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldKind {
    Null,
    Int,
    Float,
    Text,
    Blob,
}

impl FieldKind {
    /// Diagnostic label for the kind.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::Null => "NULL",
            FieldKind::Int => "INT",
            FieldKind::Float => "FLOAT",
            FieldKind::Text => "TEXT",
            FieldKind::Blob => "BLOB",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Value held by a field. Each variant owns its payload.
///
/// Booleans have no variant of their own; they collapse into `Int(0)` / `Int(1)`:
/// ```rust
/// use sql_fields::FieldValue;
///
/// assert_eq!(FieldValue::from(true), FieldValue::Int(1));
/// assert_eq!(FieldValue::from("ann"), FieldValue::Text("ann".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Binary data
    Blob(Vec<u8>),
}

impl FieldValue {
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Null => FieldKind::Null,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Blob(_) => FieldKind::Blob,
        }
    }

    /// Number of payload bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        match self {
            FieldValue::Null => 0,
            FieldValue::Int(_) => size_of::<i64>(),
            FieldValue::Float(_) => size_of::<f64>(),
            FieldValue::Text(s) => s.len(),
            FieldValue::Blob(b) => b.len(),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Copy a column value read from the engine.
    ///
    /// Text that is not valid UTF-8 is stored lossily.
    #[must_use]
    pub fn from_value_ref(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => FieldValue::Null,
            ValueRef::Integer(i) => FieldValue::Int(i),
            ValueRef::Real(f) => FieldValue::Float(f),
            ValueRef::Text(bytes) => FieldValue::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => FieldValue::Blob(bytes.to_vec()),
        }
    }
}

// Borrowed text and blobs are bound with SQLITE_TRANSIENT, so the engine keeps its own copy.
impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            FieldValue::Null => ValueRef::Null,
            FieldValue::Int(i) => ValueRef::Integer(*i),
            FieldValue::Float(f) => ValueRef::Real(*f),
            FieldValue::Text(s) => ValueRef::Text(s.as_bytes()),
            FieldValue::Blob(b) => ValueRef::Blob(b),
        };
        Ok(ToSqlOutput::Borrowed(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        FieldValue::Blob(value.to_vec())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Blob(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}
