use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;

use super::{FiltersAggregation, FiltersAggregator};
use crate::aggregation::{
    AggregationContext, AggregationError, Aggregator, AggregatorFactory, BucketStore,
};
use crate::query::{Query, Weight};
use crate::Searcher;

/// The filters of an aggregation, compiled against one searcher generation.
pub struct CompiledFilters {
    generation_id: u64,
    weights: Vec<Box<dyn Weight>>,
}

impl CompiledFilters {
    pub(crate) fn new(generation_id: u64, weights: Vec<Box<dyn Weight>>) -> CompiledFilters {
        CompiledFilters {
            generation_id,
            weights,
        }
    }

    /// The generation id of the searcher the filters were compiled against.
    pub fn generation_id(&self) -> u64 {
        self.generation_id
    }

    /// The compiled filters, in declared order.
    pub fn weights(&self) -> &[Box<dyn Weight>] {
        &self.weights
    }
}

/// Creates [`FiltersAggregator`]s.
///
/// Compiling the filters is expensive and aggregators are created for every segment, so the
/// compiled filters are cached. The cache is keyed on the
/// [generation id](crate::SearcherGeneration::generation_id) of the searcher: it is reused as
/// long as the searcher is the same one (or a clone of it), and recompiled when a different
/// searcher comes along, even one over the very same segments.
///
/// Cache hits never lock. A miss compiles under a lock, so concurrent misses on the same
/// generation compile once, and the new filters are published atomically.
pub struct FiltersAggregatorFactory {
    name: String,
    keys: Arc<[String]>,
    queries: Vec<Box<dyn Query>>,
    keyed: bool,
    other_bucket_key: Option<String>,
    sub_factories: Vec<Box<dyn AggregatorFactory>>,
    cache: ArcSwapOption<CompiledFilters>,
    compile_lock: Mutex<()>,
    compilation_count: AtomicUsize,
}

impl FiltersAggregatorFactory {
    /// Creates the factory of the filters aggregation `name`.
    ///
    /// `sub_factories` create the sub-aggregations of every bucket.
    pub fn new(
        name: impl Into<String>,
        req: FiltersAggregation,
        sub_factories: Vec<Box<dyn AggregatorFactory>>,
    ) -> crate::Result<FiltersAggregatorFactory> {
        req.validate()?;
        let (filters, keyed, other_bucket_key) = req.into_parts();
        let (keys, queries): (Vec<String>, Vec<Box<dyn Query>>) = filters.into_iter().unzip();
        Ok(FiltersAggregatorFactory {
            name: name.into(),
            keys: keys.into(),
            queries,
            keyed,
            other_bucket_key,
            sub_factories,
            cache: ArcSwapOption::empty(),
            compile_lock: Mutex::new(()),
            compilation_count: AtomicUsize::new(0),
        })
    }

    /// Number of times the filters were compiled.
    pub fn compilation_count(&self) -> usize {
        self.compilation_count.load(Ordering::SeqCst)
    }

    fn cached_filters(&self, generation_id: u64) -> Option<Arc<CompiledFilters>> {
        self.cache
            .load_full()
            .filter(|compiled| compiled.generation_id == generation_id)
    }

    /// Returns the filters compiled against `searcher`, compiling them on a cache miss.
    ///
    /// A filter that cannot be compiled fails with a
    /// [`CompilationError`](AggregationError::CompilationError) and leaves the cache untouched.
    pub fn compiled_filters(&self, searcher: &Searcher) -> crate::Result<Arc<CompiledFilters>> {
        let generation_id = searcher.generation().generation_id();
        if let Some(compiled) = self.cached_filters(generation_id) {
            return Ok(compiled);
        }
        let _compile_guard = self.compile_lock.lock()?;
        if let Some(compiled) = self.cached_filters(generation_id) {
            return Ok(compiled);
        }
        let weights = self
            .keys
            .iter()
            .zip(&self.queries)
            .map(|(key, query)| {
                query
                    .weight(searcher)
                    .map_err(|err| AggregationError::CompilationError {
                        filter: key.clone(),
                        reason: err.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.compilation_count.fetch_add(1, Ordering::SeqCst);
        debug!(
            "compiled {} filters of aggregation {:?} for searcher generation {generation_id}",
            weights.len(),
            self.name
        );
        let compiled = Arc::new(CompiledFilters::new(generation_id, weights));
        self.cache.store(Some(compiled.clone()));
        Ok(compiled)
    }

    /// Creates the aggregator of `ctx`, with its buckets held by a [`BucketStore`].
    pub fn create_filters_aggregator(
        &self,
        ctx: &AggregationContext<'_>,
    ) -> crate::Result<FiltersAggregator<BucketStore>> {
        let compiled = self.compiled_filters(ctx.searcher())?;
        let sub_aggregators = self
            .sub_factories
            .iter()
            .map(|sub_factory| sub_factory.create(ctx))
            .collect::<crate::Result<Vec<_>>>()?;
        let bucket_store = BucketStore::new(sub_aggregators, ctx.limits());
        FiltersAggregator::new(
            self.name.clone(),
            self.keys.clone(),
            compiled,
            self.keyed,
            self.other_bucket_key.clone(),
            bucket_store,
            ctx.limits(),
        )
    }
}

impl AggregatorFactory for FiltersAggregatorFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, ctx: &AggregationContext<'_>) -> crate::Result<Box<dyn Aggregator>> {
        Ok(Box::new(self.create_filters_aggregator(ctx)?))
    }
}
