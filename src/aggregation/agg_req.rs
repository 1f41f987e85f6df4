//! Contains the aggregation request tree.
//!
//! Requests are built in code:
//!
//! ```
//! use filtrate::aggregation::agg_req::{Aggregation, Aggregations};
//! use filtrate::aggregation::bucket::FiltersAggregation;
//! use filtrate::aggregation::metric::StatsAggregation;
//! use filtrate::query::TermQuery;
//!
//! let aggs = Aggregations::new()
//!     .add(
//!         "levels",
//!         Aggregation::filters(
//!             FiltersAggregation::new()
//!                 .filter("errors", TermQuery::new("level", "error"))
//!                 .filter("warnings", TermQuery::new("level", "warn")),
//!         )
//!         .sub_aggregation(
//!             "latency",
//!             Aggregation::stats(StatsAggregation::from_field_name("latency_ms")),
//!         ),
//!     )
//!     .add(
//!         "latency",
//!         Aggregation::stats(StatsAggregation::from_field_name("latency_ms")),
//!     );
//! assert_eq!(aggs.len(), 2);
//! ```

use rustc_hash::FxHashSet;

use super::bucket::{FiltersAggregation, FiltersAggregatorFactory};
use super::metric::{StatsAggregation, StatsAggregatorFactory};
use super::AggregatorFactory;
use crate::FiltrateError;

/// The aggregation requests, in the order they were added.
///
/// The key is the user defined name of the aggregation.
#[derive(Clone, Debug, Default)]
pub struct Aggregations {
    aggs: Vec<(String, Aggregation)>,
}

impl Aggregations {
    /// Creates an empty request.
    pub fn new() -> Aggregations {
        Aggregations::default()
    }

    /// Adds the aggregation `agg` under `name`.
    pub fn add(mut self, name: impl Into<String>, agg: Aggregation) -> Aggregations {
        self.aggs.push((name.into(), agg));
        self
    }

    /// Number of aggregations at this level.
    pub fn len(&self) -> usize {
        self.aggs.len()
    }

    /// Returns true if there is no aggregation.
    pub fn is_empty(&self) -> bool {
        self.aggs.is_empty()
    }

    /// Iterates over the aggregations and their names.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Aggregation)> + '_ {
        self.aggs.iter().map(|(name, agg)| (name.as_str(), agg))
    }

    /// Validates the tree and turns it into one factory per aggregation.
    pub(crate) fn build_factories(&self) -> crate::Result<Vec<Box<dyn AggregatorFactory>>> {
        let mut names = FxHashSet::default();
        let mut factories = Vec::with_capacity(self.aggs.len());
        for (name, agg) in &self.aggs {
            if !names.insert(name.as_str()) {
                return Err(FiltrateError::InvalidArgument(format!(
                    "Duplicate aggregation name {name:?}"
                )));
            }
            factories.push(agg.build_factory(name)?);
        }
        Ok(factories)
    }
}

/// Aggregation request.
///
/// An aggregation is either a bucket or a metric. Bucket aggregations can hold
/// sub-aggregations, which are computed on the documents of each of their buckets.
#[derive(Clone, Debug)]
pub struct Aggregation {
    /// The aggregation variant.
    pub agg: AggregationVariants,
    /// The sub-aggregations, computed for every bucket.
    pub sub_aggregation: Aggregations,
}

impl Aggregation {
    /// A filters bucket aggregation.
    pub fn filters(filters: FiltersAggregation) -> Aggregation {
        Aggregation {
            agg: AggregationVariants::Filters(filters),
            sub_aggregation: Aggregations::default(),
        }
    }

    /// A stats metric aggregation.
    pub fn stats(stats: StatsAggregation) -> Aggregation {
        Aggregation {
            agg: AggregationVariants::Stats(stats),
            sub_aggregation: Aggregations::default(),
        }
    }

    /// Adds a sub-aggregation named `name`.
    pub fn sub_aggregation(mut self, name: impl Into<String>, agg: Aggregation) -> Aggregation {
        self.sub_aggregation = self.sub_aggregation.add(name, agg);
        self
    }

    fn build_factory(&self, name: &str) -> crate::Result<Box<dyn AggregatorFactory>> {
        match &self.agg {
            AggregationVariants::Filters(filters) => {
                let sub_factories = self.sub_aggregation.build_factories()?;
                Ok(Box::new(FiltersAggregatorFactory::new(
                    name,
                    filters.clone(),
                    sub_factories,
                )?))
            }
            AggregationVariants::Stats(stats) => {
                if !self.sub_aggregation.is_empty() {
                    return Err(FiltrateError::InvalidArgument(format!(
                        "Metric aggregation {name:?} cannot have sub-aggregations"
                    )));
                }
                Ok(Box::new(StatsAggregatorFactory::new(name, stats.clone())))
            }
        }
    }
}

/// All aggregation types.
#[derive(Clone, Debug)]
pub enum AggregationVariants {
    /// Put documents into buckets, one per filter.
    Filters(FiltersAggregation),
    /// Computes statistics on a numeric field.
    Stats(StatsAggregation),
}
