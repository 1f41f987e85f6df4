use std::cmp::Ordering;
use std::ops::{Bound, Range};

use crate::query::{BitSetDocSet, Query, Weight};
use crate::schema::{Field, OwnedValue, Type};
use crate::{BitSet, DocId, DocSet, FiltrateError, Searcher, SegmentReader};

/// `RangeQuery` matches all documents that have at least one value within a
/// defined range.
///
/// Only numeric fields (`u64`, `i64` and `f64`) can be queried, and the bounds have to be
/// of the same type as the field.
///
/// ```rust
/// use filtrate::collector::Count;
/// use filtrate::query::RangeQuery;
/// use filtrate::schema::Schema;
/// use filtrate::{doc, Index};
/// # fn test() -> filtrate::Result<()> {
/// let mut schema_builder = Schema::builder();
/// let year_field = schema_builder.add_u64_field("year");
/// let schema = schema_builder.build();
///
/// let index = Index::create_in_ram(schema);
/// let mut index_writer = index.writer();
/// for year in 1950u64..2017u64 {
///     index_writer.add_document(doc!(year_field => year))?;
/// }
/// index_writer.commit()?;
///
/// let searcher = index.reader()?.searcher();
/// let docs_in_the_sixties = RangeQuery::new_u64("year", 1960..1970);
/// let num_60s_books = searcher.search(&docs_in_the_sixties, &Count)?;
/// assert_eq!(num_60s_books, 10);
/// Ok(())
/// # }
/// # assert!(test().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct RangeQuery {
    field_name: String,
    lower_bound: Bound<OwnedValue>,
    upper_bound: Bound<OwnedValue>,
}

impl RangeQuery {
    /// Creates a new `RangeQuery` over the given bounds.
    ///
    /// If the bounds are not of the type of the field, the query fails when it is compiled
    /// against a searcher.
    pub fn new(
        field_name: impl Into<String>,
        lower_bound: Bound<OwnedValue>,
        upper_bound: Bound<OwnedValue>,
    ) -> RangeQuery {
        RangeQuery {
            field_name: field_name.into(),
            lower_bound,
            upper_bound,
        }
    }

    /// Creates a new `RangeQuery` over a `u64` field.
    pub fn new_u64(field_name: impl Into<String>, range: Range<u64>) -> RangeQuery {
        RangeQuery::new(
            field_name,
            Bound::Included(OwnedValue::U64(range.start)),
            Bound::Excluded(OwnedValue::U64(range.end)),
        )
    }

    /// Creates a new `RangeQuery` over a `i64` field.
    pub fn new_i64(field_name: impl Into<String>, range: Range<i64>) -> RangeQuery {
        RangeQuery::new(
            field_name,
            Bound::Included(OwnedValue::I64(range.start)),
            Bound::Excluded(OwnedValue::I64(range.end)),
        )
    }

    /// Creates a new `RangeQuery` over a `f64` field.
    pub fn new_f64(field_name: impl Into<String>, range: Range<f64>) -> RangeQuery {
        RangeQuery::new(
            field_name,
            Bound::Included(OwnedValue::F64(range.start)),
            Bound::Excluded(OwnedValue::F64(range.end)),
        )
    }

    /// Field to search over
    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

fn bound_value(bound: &Bound<OwnedValue>) -> Option<&OwnedValue> {
    match bound {
        Bound::Included(value) | Bound::Excluded(value) => Some(value),
        Bound::Unbounded => None,
    }
}

impl Query for RangeQuery {
    fn weight(&self, searcher: &Searcher) -> crate::Result<Box<dyn Weight>> {
        let schema = searcher.schema();
        let field = schema.get_field(&self.field_name)?;
        let value_type = schema.get_field_entry(field).field_type();
        if !value_type.is_numeric() {
            return Err(FiltrateError::SchemaError(format!(
                "Range queries are only supported on numeric fields, field {} is of type \
                 {value_type}",
                self.field_name
            )));
        }
        for bound in [&self.lower_bound, &self.upper_bound] {
            if let Some(value) = bound_value(bound) {
                if value.value_type() != value_type {
                    return Err(FiltrateError::SchemaError(format!(
                        "Range bound {value:?} does not match the type {value_type} of field {}",
                        self.field_name
                    )));
                }
            }
        }
        Ok(Box::new(RangeWeight {
            field,
            value_type,
            lower_bound: self.lower_bound.clone(),
            upper_bound: self.upper_bound.clone(),
        }))
    }
}

struct RangeWeight {
    field: Field,
    value_type: Type,
    lower_bound: Bound<OwnedValue>,
    upper_bound: Bound<OwnedValue>,
}

fn compare(lhs: &OwnedValue, rhs: &OwnedValue) -> Option<Ordering> {
    match (lhs, rhs) {
        (OwnedValue::U64(lhs), OwnedValue::U64(rhs)) => lhs.partial_cmp(rhs),
        (OwnedValue::I64(lhs), OwnedValue::I64(rhs)) => lhs.partial_cmp(rhs),
        (OwnedValue::F64(lhs), OwnedValue::F64(rhs)) => lhs.partial_cmp(rhs),
        _ => None,
    }
}

impl RangeWeight {
    fn contains(&self, value: &OwnedValue) -> bool {
        debug_assert_eq!(value.value_type(), self.value_type);
        let above_lower = match &self.lower_bound {
            Bound::Included(lower) => matches!(
                compare(value, lower),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Bound::Excluded(lower) => compare(value, lower) == Some(Ordering::Greater),
            Bound::Unbounded => true,
        };
        let below_upper = match &self.upper_bound {
            Bound::Included(upper) => {
                matches!(compare(value, upper), Some(Ordering::Less | Ordering::Equal))
            }
            Bound::Excluded(upper) => compare(value, upper) == Some(Ordering::Less),
            Bound::Unbounded => true,
        };
        above_lower && below_upper
    }
}

impl Weight for RangeWeight {
    fn scorer(&self, reader: &SegmentReader) -> crate::Result<Box<dyn DocSet>> {
        let mut doc_bitset = BitSet::with_max_value(reader.max_doc());
        for (doc, value_opt) in reader.column(self.field).iter().enumerate() {
            // NaN never satisfies a bounded side.
            if value_opt.as_ref().is_some_and(|value| self.contains(value)) {
                doc_bitset.insert(doc as DocId);
            }
        }
        Ok(Box::new(BitSetDocSet::from(doc_bitset)))
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Bound;

    use crate::query::{Query, RangeQuery};
    use crate::schema::{OwnedValue, Schema};
    use crate::{FiltrateError, Index};

    fn create_index() -> crate::Result<Index> {
        let mut schema_builder = Schema::builder();
        let unsigned = schema_builder.add_u64_field("unsigned");
        let signed = schema_builder.add_i64_field("signed");
        let float = schema_builder.add_f64_field("float");
        let _text = schema_builder.add_text_field("text");
        let index = Index::create_in_ram(schema_builder.build());
        let mut writer = index.writer();
        for i in 0..100u64 {
            writer.add_document(doc!(
                unsigned => i,
                signed => i as i64 - 50,
                float => i as f64 / 10.0
            ))?;
            if i == 42 {
                writer.commit()?;
            }
        }
        writer.add_document(doc!(float => f64::NAN))?;
        writer.commit()?;
        Ok(index)
    }

    #[test]
    fn test_range_query_simple() -> crate::Result<()> {
        let searcher = create_index()?.reader()?.searcher();
        assert_eq!(RangeQuery::new_u64("unsigned", 10..20).count(&searcher)?, 10);
        assert_eq!(RangeQuery::new_i64("signed", -10..10).count(&searcher)?, 20);
        assert_eq!(RangeQuery::new_f64("float", 0.0..1.0).count(&searcher)?, 10);
        Ok(())
    }

    #[test]
    fn test_range_query_bounds() -> crate::Result<()> {
        let searcher = create_index()?.reader()?.searcher();
        let query = RangeQuery::new(
            "unsigned",
            Bound::Excluded(OwnedValue::U64(10)),
            Bound::Included(OwnedValue::U64(20)),
        );
        assert_eq!(query.count(&searcher)?, 10);
        let query = RangeQuery::new("unsigned", Bound::Unbounded, Bound::Excluded(OwnedValue::U64(5)));
        assert_eq!(query.count(&searcher)?, 5);
        let query = RangeQuery::new(
            "float",
            Bound::Included(OwnedValue::F64(0.0)),
            Bound::Unbounded,
        );
        assert_eq!(query.count(&searcher)?, 100);
        let query = RangeQuery::new("float", Bound::Unbounded, Bound::Unbounded);
        assert_eq!(query.count(&searcher)?, 101);
        Ok(())
    }

    #[test]
    fn test_range_query_rejects_non_numeric_field() -> crate::Result<()> {
        let searcher = create_index()?.reader()?.searcher();
        let query = RangeQuery::new(
            "text",
            Bound::Included(OwnedValue::from("a")),
            Bound::Unbounded,
        );
        assert!(matches!(query.weight(&searcher).err(), Some(FiltrateError::SchemaError(_))));
        Ok(())
    }

    #[test]
    fn test_range_query_rejects_bound_type_mismatch() -> crate::Result<()> {
        let searcher = create_index()?.reader()?.searcher();
        let query = RangeQuery::new_i64("unsigned", 0..10);
        assert!(matches!(query.weight(&searcher).err(), Some(FiltrateError::SchemaError(_))));
        Ok(())
    }
}
