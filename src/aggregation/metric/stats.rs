use serde::{Deserialize, Serialize};

use crate::aggregation::intermediate_agg_result::IntermediateAggregationResult;
use crate::aggregation::{
    AggregationContext, AggregationError, Aggregator, AggregatorFactory, BucketOrdinal,
    LeafCollector, ResourceLimitGuard,
};
use crate::schema::Field;
use crate::{DocId, SegmentReader};

/// A multi-value metric aggregation that computes a collection of statistics on numeric values
/// that are extracted from the aggregated documents.
/// See [`Stats`] for returned statistics.
///
/// Documents without a value in the field are ignored.
///
/// # JSON Format
/// ```json
/// {
///     "stats": {
///         "field": "score"
///     }
///  }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsAggregation {
    /// The field name to compute the stats on.
    pub field: String,
}

impl StatsAggregation {
    /// Creates a new [`StatsAggregation`] instance from a field name.
    pub fn from_field_name(field_name: impl Into<String>) -> Self {
        StatsAggregation {
            field: field_name.into(),
        }
    }

    /// Returns the field name the aggregation is computed on.
    pub fn field_name(&self) -> &str {
        &self.field
    }
}

/// Stats contains a collection of statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// The number of documents.
    pub count: u64,
    /// The sum of the field values.
    pub sum: f64,
    /// The min value of the field values.
    pub min: Option<f64>,
    /// The max value of the field values.
    pub max: Option<f64>,
    /// The average of the field values. `None` if count equals zero.
    pub avg: Option<f64>,
}

/// Intermediate result of the stats aggregation that can be combined with other intermediate
/// results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntermediateStats {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl Default for IntermediateStats {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::MAX,
            max: f64::MIN,
        }
    }
}

impl IntermediateStats {
    /// Merges the other stats intermediate result into self.
    pub fn merge_fruits(&mut self, other: IntermediateStats) {
        self.count += other.count;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Computes the final stats value.
    pub fn finalize(&self) -> Stats {
        if self.count == 0 {
            return Stats {
                count: 0,
                sum: self.sum,
                min: None,
                max: None,
                avg: None,
            };
        }
        Stats {
            count: self.count,
            sum: self.sum,
            min: Some(self.min),
            max: Some(self.max),
            avg: Some(self.sum / (self.count as f64)),
        }
    }

    #[inline]
    fn collect(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Creates the [`StatsAggregator`]s of a stats aggregation.
pub struct StatsAggregatorFactory {
    name: String,
    req: StatsAggregation,
}

impl StatsAggregatorFactory {
    /// Creates a factory for the stats aggregation named `name`.
    pub fn new(name: impl Into<String>, req: StatsAggregation) -> Self {
        StatsAggregatorFactory {
            name: name.into(),
            req,
        }
    }

    fn resolve_field(&self, ctx: &AggregationContext<'_>) -> Result<Field, AggregationError> {
        let schema = ctx.searcher().schema();
        let field = schema
            .get_field(self.req.field_name())
            .map_err(|err| AggregationError::CompilationError {
                filter: self.name.clone(),
                reason: err.to_string(),
            })?;
        let field_type = schema.get_field_entry(field).field_type();
        if !field_type.is_numeric() {
            return Err(AggregationError::CompilationError {
                filter: self.name.clone(),
                reason: format!(
                    "Field {:?} is of type {field_type}, stats require a numeric field",
                    self.req.field_name()
                ),
            });
        }
        Ok(field)
    }
}

impl AggregatorFactory for StatsAggregatorFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, ctx: &AggregationContext<'_>) -> crate::Result<Box<dyn Aggregator>> {
        let field = self.resolve_field(ctx)?;
        Ok(Box::new(StatsAggregator {
            name: self.name.clone(),
            field,
            stats: Vec::new(),
            memory_guard: ctx.limits().new_guard(),
        }))
    }
}

/// Computes [`IntermediateStats`] for every owning bucket.
pub struct StatsAggregator {
    name: String,
    field: Field,
    stats: Vec<IntermediateStats>,
    memory_guard: ResourceLimitGuard,
}

impl Aggregator for StatsAggregator {
    fn name(&self) -> &str {
        &self.name
    }

    fn leaf_collector<'a>(
        &'a mut self,
        segment: &'a SegmentReader,
    ) -> crate::Result<Box<dyn LeafCollector + 'a>> {
        Ok(Box::new(StatsLeafCollector {
            field: self.field,
            segment,
            stats: &mut self.stats,
            memory_guard: &mut self.memory_guard,
        }))
    }

    fn build_aggregation(
        &self,
        owning_ord: BucketOrdinal,
    ) -> crate::Result<IntermediateAggregationResult> {
        let stats = usize::try_from(owning_ord)
            .ok()
            .and_then(|idx| self.stats.get(idx))
            .cloned()
            .unwrap_or_default();
        Ok(IntermediateAggregationResult::Stats(stats))
    }

    fn build_empty_aggregation(&self) -> IntermediateAggregationResult {
        IntermediateAggregationResult::Stats(IntermediateStats::default())
    }
}

struct StatsLeafCollector<'a> {
    field: Field,
    segment: &'a SegmentReader,
    stats: &'a mut Vec<IntermediateStats>,
    memory_guard: &'a mut ResourceLimitGuard,
}

impl LeafCollector for StatsLeafCollector<'_> {
    #[inline]
    fn collect(&mut self, doc: DocId, owning_ord: BucketOrdinal) -> crate::Result<()> {
        let idx = usize::try_from(owning_ord).map_err(|_| AggregationError::OrdinalOverflow {
            owning_ordinal: owning_ord,
            total_slots: 1,
        })?;
        if idx >= self.stats.len() {
            let num_new = (idx - self.stats.len()) as u64 + 1;
            self.memory_guard.add_memory_consumed(
                num_new.saturating_mul(std::mem::size_of::<IntermediateStats>() as u64),
            )?;
            self.stats.resize_with(idx + 1, IntermediateStats::default);
        }
        if let Some(value) = self
            .segment
            .value(self.field, doc)
            .and_then(|value| value.as_f64())
        {
            self.stats[idx].collect(value);
        }
        Ok(())
    }
}
