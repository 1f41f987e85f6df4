//! Schema definition for filtrate's indices.
//!
//! filtrate has a very strict schema: every field is declared in advance with a name and a
//! [`Type`]. Documents carrying a value whose type does not match its field are rejected by the
//! [`IndexWriter`](crate::IndexWriter).
//!
//! ```
//! use filtrate::schema::{Schema, Type};
//!
//! let mut schema_builder = Schema::builder();
//! let title = schema_builder.add_text_field("title");
//! let num_stars = schema_builder.add_u64_field("num_stars");
//! let schema = schema_builder.build();
//! assert_eq!(schema.get_field("num_stars").unwrap(), num_stars);
//! assert_eq!(schema.get_field_entry(title).field_type(), Type::Str);
//! ```

mod document;
mod field;
#[allow(clippy::module_inception)]
mod schema;
mod value;

pub use self::document::Document;
pub use self::field::Field;
pub use self::schema::{FieldEntry, Schema, SchemaBuilder};
pub use self::value::{OwnedValue, Type};
