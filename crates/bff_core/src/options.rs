//! Construction-time configuration.
//!
//! [`FilterOptions`] is the programmatic builder; misuse panics because it is a
//! bug in the caller. [`IndexConfig`] is the data path (JSON files, CLI flags)
//! and reports problems as [`BffError::InvalidConfig`].
use crate::consts::{DEFAULT_INDEX_FILTER_BITS, DEFAULT_MAPPERS, MAX_SHARDS};
use crate::errors::{BffError, Result};
use crate::mapper::{MapperFactory, Xxh64Factory};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct FilterOptions {
    pub(crate) mappers: usize,
    pub(crate) factory: Arc<dyn MapperFactory>,
}

impl FilterOptions {
    /// Default XXH64 mapper family with `DEFAULT_MAPPERS` probes.
    pub fn new() -> Self {
        Self { mappers: DEFAULT_MAPPERS, factory: Arc::new(Xxh64Factory) }
    }

    /// Number of independent hash probes per term.
    ///
    /// # Panics
    ///
    /// Panics when `k == 0`.
    pub fn with_mappers(mut self, k: usize) -> Self {
        assert!(k > 0, "number of mappers cannot be 0");
        self.mappers = k;
        self
    }

    /// Replace the default XXH64 family.
    pub fn with_custom_mapper(mut self, factory: impl MapperFactory + 'static) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    /// Derive the mapper count from a target false-positive rate.
    ///
    /// See <https://en.wikipedia.org/wiki/Bloom_filter#Probability_of_false_positives>.
    ///
    /// # Panics
    ///
    /// Always. Sizing from an error rate is not implemented; pick `k` with
    /// [`FilterOptions::with_mappers`].
    pub fn with_error_rate(self, _rate: f64) -> Self {
        unimplemented!("sizing filters from a false-positive rate")
    }

    pub fn mappers(&self) -> usize {
        self.mappers
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterOptions").field("mappers", &self.mappers).finish_non_exhaustive()
    }
}

/// Serializable index settings, e.g. loaded from `bff.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Lookup parallelism, `1..=MAX_SHARDS`.
    pub shards: usize,
    pub mappers: usize,
    /// Bits per document vector.
    pub filter_bits: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            shards: std::thread::available_parallelism()
                .map(|n| n.get().min(MAX_SHARDS))
                .unwrap_or(1),
            mappers: DEFAULT_MAPPERS,
            filter_bits: DEFAULT_INDEX_FILTER_BITS,
        }
    }
}

impl IndexConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: IndexConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shards == 0 {
            return Err(BffError::InvalidConfig("shards must be > 0".into()));
        }
        if self.shards > MAX_SHARDS {
            return Err(BffError::InvalidConfig(format!("shards must be <= {MAX_SHARDS}")));
        }
        if self.mappers == 0 {
            return Err(BffError::InvalidConfig("mappers must be > 0".into()));
        }
        if self.filter_bits == 0 {
            return Err(BffError::InvalidConfig("filter_bits must be > 0".into()));
        }
        Ok(())
    }

    /// Builder options for the default mapper family.
    ///
    /// # Panics
    ///
    /// Panics if `mappers == 0`; call [`IndexConfig::validate`] first on untrusted input.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::new().with_mappers(self.mappers)
    }
}
