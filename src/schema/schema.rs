use std::collections::HashMap;
use std::sync::Arc;

use super::{Field, Type};
use crate::FiltrateError;

/// A field entry represents a field and its configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldEntry {
    name: String,
    field_type: Type,
}

impl FieldEntry {
    /// Creates a new field entry.
    pub fn new(field_name: &str, field_type: Type) -> FieldEntry {
        FieldEntry {
            name: field_name.to_string(),
            field_type,
        }
    }

    /// Returns the name of the field
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field type
    pub fn field_type(&self) -> Type {
        self.field_type
    }
}

/// Builds a [`Schema`] by setting up the fields one by one.
#[derive(Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldEntry>,
    fields_map: HashMap<String, Field>,
}

impl SchemaBuilder {
    /// Create a new `SchemaBuilder`
    pub fn new() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Adds a new u64 field.
    /// Returns the associated field handle
    ///
    /// # Caution
    ///
    /// Appending two fields with the same name
    /// will result in the shadowing of the first
    /// by the second one.
    pub fn add_u64_field(&mut self, field_name: &str) -> Field {
        self.add_field(FieldEntry::new(field_name, Type::U64))
    }

    /// Adds a new i64 field.
    /// Returns the associated field handle
    pub fn add_i64_field(&mut self, field_name: &str) -> Field {
        self.add_field(FieldEntry::new(field_name, Type::I64))
    }

    /// Adds a new f64 field.
    /// Returns the associated field handle
    pub fn add_f64_field(&mut self, field_name: &str) -> Field {
        self.add_field(FieldEntry::new(field_name, Type::F64))
    }

    /// Adds a new text field.
    /// Returns the associated field handle
    ///
    /// Text is matched as a whole: no tokenization happens.
    pub fn add_text_field(&mut self, field_name: &str) -> Field {
        self.add_field(FieldEntry::new(field_name, Type::Str))
    }

    /// Adds a new bool field.
    /// Returns the associated field handle
    pub fn add_bool_field(&mut self, field_name: &str) -> Field {
        self.add_field(FieldEntry::new(field_name, Type::Bool))
    }

    /// Adds a field entry to the schema in build.
    pub fn add_field(&mut self, field_entry: FieldEntry) -> Field {
        let field = Field::from_field_id(self.fields.len() as u32);
        let field_name = field_entry.name().to_string();
        self.fields.push(field_entry);
        self.fields_map.insert(field_name, field);
        field
    }

    /// Finalize the creation of a `Schema`
    /// This will consume your `SchemaBuilder`
    pub fn build(self) -> Schema {
        Schema(Arc::new(InnerSchema {
            fields: self.fields,
            fields_map: self.fields_map,
        }))
    }
}

#[derive(Debug)]
struct InnerSchema {
    fields: Vec<FieldEntry>,
    fields_map: HashMap<String, Field>, // transient
}

impl PartialEq for InnerSchema {
    fn eq(&self, other: &InnerSchema) -> bool {
        self.fields == other.fields
    }
}

impl Eq for InnerSchema {}

/// The list of fields of an index, with their types.
///
/// A schema is cheap to clone.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Schema(Arc<InnerSchema>);

impl Schema {
    /// Creates a new builder.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Return the `FieldEntry` associated to a `Field`.
    pub fn get_field_entry(&self, field: Field) -> &FieldEntry {
        &self.0.fields[field.field_id() as usize]
    }

    /// Return the field name for a given `Field`.
    pub fn get_field_name(&self, field: Field) -> &str {
        self.get_field_entry(field).name()
    }

    /// Returns the number of fields.
    pub fn num_fields(&self) -> usize {
        self.0.fields.len()
    }

    /// Return the list of all the `Field`s.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldEntry)> {
        self.0
            .fields
            .iter()
            .enumerate()
            .map(|(field_id, field_entry)| (Field::from_field_id(field_id as u32), field_entry))
    }

    /// Returns the field associated with a given name.
    pub fn get_field(&self, field_name: &str) -> crate::Result<Field> {
        self.0
            .fields_map
            .get(field_name)
            .cloned()
            .ok_or_else(|| FiltrateError::SchemaError(format!("Field {field_name} not found")))
    }
}
