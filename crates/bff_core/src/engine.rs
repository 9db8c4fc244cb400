use crate::index::{LookupResult, ShardedIndex, Verifier};
use crate::options::FilterOptions;
use std::marker::PhantomData;

/// Turns documents of type `T` and queries of type `Q` into raw terms.
pub trait TermsExtractor<T, Q> {
    fn extract_value_terms(&self, input: &T) -> Vec<Vec<u8>>;
    fn extract_query_terms(&self, query: &Q) -> Vec<Vec<u8>>;
}

/// Typed front end over [`ShardedIndex`], one shard per available CPU.
pub struct SearchEngine<T, Q, E, V> {
    extractor: E,
    index: ShardedIndex<V>,
    _types: PhantomData<fn(&T, &Q)>,
}

impl<T, Q, E, V> SearchEngine<T, Q, E, V>
where
    E: TermsExtractor<T, Q>,
    V: Verifier,
{
    pub fn new(extractor: E, verifier: V, opts: FilterOptions) -> Self {
        let shards = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self::with_index(extractor, ShardedIndex::new(shards, verifier, opts))
    }

    pub fn with_index(extractor: E, index: ShardedIndex<V>) -> Self {
        Self { extractor, index, _types: PhantomData }
    }

    pub fn index(&self, id: u64, input: &T) {
        self.index.add(id, &self.extractor.extract_value_terms(input));
    }

    pub fn lookup(&self, query: &Q) -> LookupResult {
        self.index.lookup(&self.extractor.extract_query_terms(query))
    }

    pub fn inner(&self) -> &ShardedIndex<V> {
        &self.index
    }
}
