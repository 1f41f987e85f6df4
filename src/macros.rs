/// `doc!` is a shortcut that helps building `Document`
/// objects.
///
/// Assuming that `field1` and `field2` are `Field` instances.
/// You can create a document with a value of `value1` for `field1`
/// `value2` for `field2`, as follows :
///
/// ```c
/// doc!(
///     field1 => value1,
///     field2 => value2,
/// )
/// ```
///
/// The value can be a `u64`, a `i64`, a `f64`, a `bool`, a `&str` or a `String`.
///
/// # Warning
///
/// The document hence created, is not yet validated against a schema.
/// Nothing prevents its user from creating an invalid document,
/// associating a `String` to a `u64` field for instance.
/// [`IndexWriter::add_document`](crate::IndexWriter::add_document) rejects such documents.
///
/// # Example
///
/// ```rust
/// use filtrate::schema::Schema;
/// use filtrate::doc;
///
/// let mut schema_builder = Schema::builder();
/// let title = schema_builder.add_text_field("title");
/// let likes = schema_builder.add_u64_field("likes");
/// let schema = schema_builder.build();
/// let doc = doc!(
///     title => "Life Aquatic",
///     likes => 4u64
/// );
/// assert_eq!(doc.len(), 2);
/// ```
#[macro_export]
macro_rules! doc(
    () => {
        {
            ($crate::Document::default())
        }
    }; // avoids a warning due to the useless `mut`.
    ($($field:expr => $value:expr),*) => {
        {
            let mut document = $crate::Document::default();
            $(
                document.add_field_value($field, $value);
            )*
            document
        }
    };
    // if there is a trailing comma retry with the trailing comma stripped.
    ($($field:expr => $value:expr),+ ,) => {
        doc!( $( $field => $value ), *)
    };
);
