use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::field::Field;

/// A row from a query result
///
/// Fields keep the column order reported by the engine.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    fields: Vec<Field>,
}

impl Row {
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Get a field by column name
    ///
    /// Duplicate column names resolve to the first occurrence.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == column_name)
    }

    /// Get a field by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[must_use]
    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Render the row as a JSON object keyed by column name.
    ///
    /// Blobs become arrays of byte values; a later duplicate column overwrites an earlier one.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = serde_json::to_value(field.value()).unwrap_or(JsonValue::Null);
            map.insert(field.name().to_owned(), value);
        }
        JsonValue::Object(map)
    }
}

impl From<Vec<Field>> for Row {
    fn from(fields: Vec<Field>) -> Self {
        Self::new(fields)
    }
}

impl IntoIterator for Row {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
