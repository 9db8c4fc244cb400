// crates/bff_core/src/consts.rs

/// Width of one storage block of a bit-vector.
pub const BLOCK_BITS: usize = u64::BITS as usize;

/// Per-document vector size used by the sharded index unless configured otherwise.
pub const DEFAULT_INDEX_FILTER_BITS: usize = 64;

/// Upper bound on lookup parallelism; each shard is one thread per lookup.
pub const MAX_SHARDS: usize = 1024;

/// Number of mappers used when a configuration file does not set one.
pub const DEFAULT_MAPPERS: usize = 1;

/// Number of 64-bit blocks needed to hold `bits` bits.
#[inline]
pub const fn block_count(bits: usize) -> usize {
    bits.div_ceil(BLOCK_BITS)
}

const _: () = { assert!(block_count(64) == 1 && block_count(65) == 2 && block_count(1) == 1); };
