use filtrate::aggregation::agg_result::{AggregationResult, FiltersResult};
use filtrate::aggregation::metric::Stats;
use filtrate::schema::Schema;
use filtrate::{doc, Index};

/// Helper function to extract a filters result
pub fn get_filters(result: &AggregationResult) -> Option<&FiltersResult> {
    if let AggregationResult::Filters(filters) = result {
        Some(filters)
    } else {
        None
    }
}

/// Helper function to extract stats from a stats aggregation
pub fn get_stats(result: &AggregationResult) -> Option<&Stats> {
    if let AggregationResult::Stats(stats) = result {
        Some(stats)
    } else {
        None
    }
}

/// The `(key, doc_count)` of every bucket of a filters result, in output order.
pub fn bucket_counts(result: &AggregationResult) -> Vec<(String, u64)> {
    get_filters(result)
        .expect("not a filters result")
        .iter()
        .map(|(key, bucket)| (key.to_string(), bucket.doc_count))
        .collect()
}

/// Creates an index over the doc ids `0..num_docs`, with `docs_per_segment` documents per
/// segment.
///
/// Fields:
/// - `id`: the doc id, as u64
/// - `even`: true for even ids
/// - `div3`: true for ids divisible by 3
/// - `category`: "small" below 10, "big" otherwise
/// - `price`: `id * 10`, as f64
pub fn ids_index(num_docs: u64, docs_per_segment: u64) -> filtrate::Result<Index> {
    let mut schema_builder = Schema::builder();
    let id = schema_builder.add_u64_field("id");
    let even = schema_builder.add_bool_field("even");
    let div3 = schema_builder.add_bool_field("div3");
    let category = schema_builder.add_text_field("category");
    let price = schema_builder.add_f64_field("price");
    let index = Index::create_in_ram(schema_builder.build());
    let mut writer = index.writer();
    for doc_id in 0..num_docs {
        writer.add_document(doc!(
            id => doc_id,
            even => doc_id % 2 == 0,
            div3 => doc_id % 3 == 0,
            category => if doc_id < 10 { "small" } else { "big" },
            price => doc_id as f64 * 10.0,
        ))?;
        if (doc_id + 1) % docs_per_segment == 0 {
            writer.commit()?;
        }
    }
    writer.commit()?;
    Ok(index)
}
