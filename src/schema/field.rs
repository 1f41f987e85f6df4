use serde::{Deserialize, Serialize};

/// `Field` is a `u32` identifying a field within a [`Schema`](crate::schema::Schema).
///
/// The schema is in charge of holding the mapping between field names
/// and `Field` objects.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord, Hash, Serialize, Deserialize)]
pub struct Field(u32);

impl Field {
    /// Create a new field object for the given field id.
    pub const fn from_field_id(field_id: u32) -> Field {
        Field(field_id)
    }

    /// Returns a u32 identifying uniquely a field within a schema.
    pub const fn field_id(self) -> u32 {
        self.0
    }
}
