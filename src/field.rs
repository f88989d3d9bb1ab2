use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::SqlFieldsError;
use crate::types::{FieldKind, FieldValue};

/// One named, typed column value.
///
/// The kind is read off the stored [`FieldValue`], so replacing the value re-tags the
/// field in a single step.
/// ```rust
/// use sql_fields::{Field, FieldKind};
///
/// let mut age = Field::new("age", 30);
/// assert_eq!(age.as_i64().unwrap(), 30);
/// assert_eq!(age.bind_name(), ":age");
///
/// age.set_value(30.5);
/// assert_eq!(age.kind(), FieldKind::Float);
/// assert!(age.as_i64().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    value: FieldValue,
}

impl Field {
    /// A field holding SQL NULL.
    pub fn null(name: impl Into<String>) -> Self {
        Self::new(name, FieldValue::Null)
    }

    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Placeholder name used when binding this field: `":" + name`.
    #[must_use]
    pub fn bind_name(&self) -> String {
        format!(":{}", self.name)
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }

    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> FieldValue {
        self.value
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.value.byte_len()
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    pub fn set_value(&mut self, value: impl Into<FieldValue>) {
        self.value = value.into();
    }

    pub fn set_null(&mut self) {
        self.set_value(FieldValue::Null);
    }

    /// # Errors
    /// Returns [`SqlFieldsError::TypeMismatch`] unless the field holds an integer.
    pub fn as_i64(&self) -> Result<i64, SqlFieldsError> {
        match self.value {
            FieldValue::Int(i) => Ok(i),
            _ => Err(self.mismatch(FieldKind::Int)),
        }
    }

    /// Integer field read as a flag: any non-zero value is `true`.
    ///
    /// # Errors
    /// Returns [`SqlFieldsError::TypeMismatch`] unless the field holds an integer.
    pub fn as_bool(&self) -> Result<bool, SqlFieldsError> {
        self.as_i64().map(|i| i != 0)
    }

    /// # Errors
    /// Returns [`SqlFieldsError::TypeMismatch`] unless the field holds a float.
    pub fn as_f64(&self) -> Result<f64, SqlFieldsError> {
        match self.value {
            FieldValue::Float(f) => Ok(f),
            _ => Err(self.mismatch(FieldKind::Float)),
        }
    }

    /// # Errors
    /// Returns [`SqlFieldsError::TypeMismatch`] unless the field holds text.
    pub fn as_text(&self) -> Result<&str, SqlFieldsError> {
        match &self.value {
            FieldValue::Text(s) => Ok(s),
            _ => Err(self.mismatch(FieldKind::Text)),
        }
    }

    /// # Errors
    /// Returns [`SqlFieldsError::TypeMismatch`] unless the field holds a blob.
    pub fn as_bytes(&self) -> Result<&[u8], SqlFieldsError> {
        match &self.value {
            FieldValue::Blob(b) => Ok(b),
            _ => Err(self.mismatch(FieldKind::Blob)),
        }
    }

    fn mismatch(&self, expected: FieldKind) -> SqlFieldsError {
        SqlFieldsError::TypeMismatch {
            field: self.name.clone(),
            expected,
            actual: self.kind(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(type: {}, name: {}", self.kind(), self.name)?;
        match &self.value {
            FieldValue::Null => {}
            FieldValue::Int(i) => write!(f, ", value: {i}")?,
            FieldValue::Float(v) => write!(f, ", value: {v}")?,
            FieldValue::Text(s) => write!(f, ", value: {s}")?,
            FieldValue::Blob(b) => write!(f, ", value: <{} bytes>", b.len())?,
        }
        f.write_str(")")
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Field", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}
