use crate::schema::{Field, OwnedValue};

/// A document is a list of field values.
///
/// Documents are usually built with the [`doc!`](crate::doc) macro.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Document {
    field_values: Vec<(Field, OwnedValue)>,
}

impl From<Vec<(Field, OwnedValue)>> for Document {
    fn from(field_values: Vec<(Field, OwnedValue)>) -> Self {
        Document { field_values }
    }
}

impl Document {
    /// Creates a new, empty document object
    pub fn new() -> Document {
        Document::default()
    }

    /// Returns the number of `(field, value)` pairs.
    pub fn len(&self) -> usize {
        self.field_values.len()
    }

    /// Returns true if the document contains no fields.
    pub fn is_empty(&self) -> bool {
        self.field_values.is_empty()
    }

    /// Add a (field, value) to the document.
    pub fn add_field_value<T: Into<OwnedValue>>(&mut self, field: Field, value: T) {
        self.field_values.push((field, value.into()));
    }

    /// Returns all of the `(field, value)` pairs, in insertion order.
    pub fn field_values(&self) -> impl Iterator<Item = (Field, &OwnedValue)> {
        self.field_values
            .iter()
            .map(|(field, value)| (*field, value))
    }

    /// Returns the first value associated with the given field
    pub fn get_first(&self, field: Field) -> Option<&OwnedValue> {
        self.field_values
            .iter()
            .find(|(doc_field, _)| *doc_field == field)
            .map(|(_, value)| value)
    }
}
