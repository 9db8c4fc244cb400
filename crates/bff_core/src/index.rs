//! Append-only, in-memory search index built on per-document Bloom filters.
//!
//! `lookup` scans the stored vectors in parallel shards and asks an external
//! [`Verifier`] to confirm every filter-positive candidate.
//!
//! Locking:
//!   entries + ids share one `RwLock`. `add` encodes outside the lock and only
//!   appends under the write lock. `lookup` holds the read lock until every
//!   shard has finished and merged, so it sees a fixed snapshot and concurrent
//!   `add`s wait for it.
//!
//! Partial failure: a Verifier error stops the shard that hit it and drops that
//! shard's confirmed ids. Sibling shards are not cancelled and their ids are
//! still returned alongside the first error.
use crate::consts::{DEFAULT_INDEX_FILTER_BITS, MAX_SHARDS};
use crate::errors::{BffError, Result, VerifyError};
use crate::filter::BloomFilter;
use crate::options::{FilterOptions, IndexConfig};
use crate::pool::BitVector;
use parking_lot::{Mutex, RwLock};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Authoritative exact-match check for one document against one query.
///
/// Called concurrently from several shard threads.
pub trait Verifier: Send + Sync {
    fn verify(&self, id: u64, terms: &[Vec<u8>]) -> std::result::Result<bool, VerifyError>;
}

impl<V: Verifier + ?Sized> Verifier for Arc<V> {
    fn verify(&self, id: u64, terms: &[Vec<u8>]) -> std::result::Result<bool, VerifyError> {
        (**self).verify(id, terms)
    }
}

/// Confirms every candidate. Lookups then return raw filter hits.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl Verifier for AcceptAll {
    fn verify(&self, _id: u64, _terms: &[Vec<u8>]) -> std::result::Result<bool, VerifyError> {
        Ok(true)
    }
}

/// Confirmed ids plus the first Verifier error, if any.
///
/// With `error` set, `ids` holds only what the non-failing shards confirmed.
#[derive(Debug, Default)]
pub struct LookupResult {
    pub ids: Vec<u64>,
    pub error: Option<BffError>,
}

impl LookupResult {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// All-or-nothing view: any shard failure discards the partial ids.
    pub fn into_result(self) -> Result<Vec<u64>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.ids),
        }
    }
}

#[derive(Default)]
struct Entries {
    data: Vec<BitVector>,
    ids: Vec<u64>,
}

pub struct ShardedIndex<V> {
    entries: RwLock<Entries>,
    shards: usize,
    filters: BloomFilter,
    verifier: V,
}

impl<V: Verifier> ShardedIndex<V> {
    /// Index with one 64-bit vector per document.
    ///
    /// # Panics
    ///
    /// Panics when `shards` is outside `1..=MAX_SHARDS`.
    pub fn new(shards: usize, verifier: V, opts: FilterOptions) -> Self {
        Self::with_filter_bits(shards, DEFAULT_INDEX_FILTER_BITS, verifier, opts)
    }

    /// # Panics
    ///
    /// Panics when `shards` is outside `1..=MAX_SHARDS` or `filter_bits == 0`.
    pub fn with_filter_bits(
        shards: usize,
        filter_bits: usize,
        verifier: V,
        opts: FilterOptions,
    ) -> Self {
        assert!(shards > 0, "number of shards cannot be 0");
        assert!(shards <= MAX_SHARDS, "number of shards cannot exceed {MAX_SHARDS}");
        Self {
            entries: RwLock::new(Entries::default()),
            shards,
            filters: BloomFilter::new(filter_bits, opts),
            verifier,
        }
    }

    pub fn from_config(cfg: &IndexConfig, verifier: V) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::with_filter_bits(cfg.shards, cfg.filter_bits, verifier, cfg.filter_options()))
    }

    pub fn shards(&self) -> usize {
        self.shards
    }

    pub fn filter(&self) -> &BloomFilter {
        &self.filters
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    pub fn len(&self) -> usize {
        self.entries.read().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add<T: AsRef<[u8]>>(&self, id: u64, terms: &[T]) {
        let mut data = self.filters.acquire();
        for term in terms {
            self.filters.add(&mut data, term.as_ref());
        }
        let data = data.detach();

        let mut entries = self.entries.write();
        entries.data.push(data);
        entries.ids.push(id);
        debug!(id, terms = terms.len(), entries = entries.ids.len(), "indexed document");
    }

    /// Ids whose filters pass every non-empty term, without verification.
    pub fn candidates<T: AsRef<[u8]>>(&self, terms: &[T]) -> Vec<u64> {
        let entries = self.entries.read();
        entries
            .data
            .iter()
            .zip(&entries.ids)
            .filter(|(data, _)| self.passes(data, terms))
            .map(|(_, id)| *id)
            .collect()
    }

    pub fn lookup(&self, terms: &[Vec<u8>]) -> LookupResult {
        let entries = self.entries.read();
        let ranges = shard_ranges(entries.ids.len(), self.shards);
        debug!(entries = entries.ids.len(), shards = ranges.len(), terms = terms.len(), "lookup");

        let merged = Mutex::new(Vec::new());
        let first_err: Mutex<Option<BffError>> = Mutex::new(None);

        std::thread::scope(|s| {
            for (shard, range) in ranges.into_iter().enumerate() {
                let data = &entries.data[range.clone()];
                let ids = &entries.ids[range];
                let merged = &merged;
                let first_err = &first_err;
                s.spawn(move || match self.scan_shard(data, ids, terms) {
                    Ok(hits) => {
                        trace!(shard, hits = hits.len(), "shard done");
                        if !hits.is_empty() {
                            merged.lock().extend(hits);
                        }
                    }
                    Err(e) => {
                        warn!(shard, error = %e, "shard aborted");
                        first_err.lock().get_or_insert(e);
                    }
                });
            }
        });

        LookupResult { ids: merged.into_inner(), error: first_err.into_inner() }
    }

    fn scan_shard(&self, data: &[BitVector], ids: &[u64], terms: &[Vec<u8>]) -> Result<Vec<u64>> {
        let hits: Vec<u64> = data
            .iter()
            .zip(ids)
            .filter(|(data, _)| self.passes(data, terms))
            .map(|(_, id)| *id)
            .collect();

        let mut verified = Vec::with_capacity(hits.len());
        for id in hits {
            match self.verifier.verify(id, terms) {
                Ok(true) => verified.push(id),
                Ok(false) => {}
                Err(source) => return Err(BffError::Verify { id, source }),
            }
        }
        Ok(verified)
    }

    // Zero-length terms never exclude a document.
    fn passes<T: AsRef<[u8]>>(&self, data: &BitVector, terms: &[T]) -> bool {
        terms
            .iter()
            .map(AsRef::<[u8]>::as_ref)
            .filter(|t| !t.is_empty())
            .all(|t| self.filters.may_contain(data, t))
    }
}

/// Split `len` entries into `shards` contiguous ranges of `len / shards`.
///
/// The last range also takes the `len % shards` remainder so every entry is
/// scanned. When `len < shards` a single range covers everything.
pub fn shard_ranges(len: usize, shards: usize) -> Vec<Range<usize>> {
    let size = len / shards.max(1);
    if size == 0 {
        return vec![0..len];
    }
    let mut ranges: Vec<Range<usize>> = (0..shards).map(|k| k * size..(k + 1) * size).collect();
    if let Some(last) = ranges.last_mut() {
        last.end = len;
    }
    ranges
}
