//! Bloom filter engine over pooled 64-bit block vectors.
//!
//! The engine holds no per-document state: callers own the [`BitVector`]s and
//! pass them to [`BloomFilter::add`] / [`BloomFilter::may_contain`]. Bit `i`
//! lives in block `i / 64` at shift `63 - i % 64`, so the debug rendering
//! reads left to right.
use crate::consts::{block_count, BLOCK_BITS};
use crate::mapper::Mappers;
use crate::options::FilterOptions;
use crate::pool::{BitVector, BitVectorPool, PooledVector};

#[derive(Debug)]
pub struct BloomFilter {
    size_bits: usize,
    mappers: Mappers,
    pool: BitVectorPool,
}

impl BloomFilter {
    /// # Panics
    ///
    /// Panics when `size_bits == 0`.
    pub fn new(size_bits: usize, opts: FilterOptions) -> Self {
        assert!(size_bits > 0, "filter size cannot be 0");
        let mappers = Mappers::create(opts.factory.as_ref(), size_bits, opts.mappers);
        Self { size_bits, mappers, pool: BitVectorPool::new(block_count(size_bits)) }
    }

    /// Number of bits.
    pub fn size_bits(&self) -> usize {
        self.size_bits
    }

    /// Number of hash probes per term (k).
    pub fn mappers(&self) -> usize {
        self.mappers.len()
    }

    pub fn pool(&self) -> &BitVectorPool {
        &self.pool
    }

    /// Zeroed vector sized for this filter, returned to the pool on drop.
    pub fn acquire(&self) -> PooledVector<'_> {
        self.pool.acquire()
    }

    pub fn release(&self, v: BitVector) {
        self.pool.release(v);
    }

    pub fn preallocate(&self, n: usize) {
        self.pool.preallocate(n);
    }

    /// Encode `term` into `data`.
    pub fn add(&self, data: &mut BitVector, term: &[u8]) {
        for pos in self.mappers.positions(term) {
            self.set_bit(data, pos);
        }
    }

    /// `false` means `term` was never added to `data`.
    pub fn may_contain(&self, data: &BitVector, term: &[u8]) -> bool {
        self.mappers.positions(term).all(|pos| self.is_bit_set(data, pos))
    }

    /// Positions probed for `term`, in mapper order.
    pub fn probe_positions(&self, term: &[u8]) -> Vec<usize> {
        self.mappers.positions(term).collect()
    }

    /// Render `data` as a bit string with `^` under the bits `term` maps to.
    pub fn debug(&self, data: &BitVector, term: &[u8]) -> String {
        let mut bits: String = data.blocks().iter().map(|b| format!("{b:064b}")).collect();
        bits.truncate(self.size_bits);

        let mut marks = vec![b' '; self.size_bits];
        for pos in self.mappers.positions(term) {
            self.check_position(pos);
            marks[pos] = b'^';
        }
        let marks = String::from_utf8(marks).unwrap_or_default();

        format!("{bits}\n{marks}")
    }

    #[inline]
    fn set_bit(&self, data: &mut BitVector, i: usize) {
        let (block, mask) = self.locate(data, i);
        data.blocks_mut()[block] |= mask;
    }

    #[inline]
    fn is_bit_set(&self, data: &BitVector, i: usize) -> bool {
        let (block, mask) = self.locate(data, i);
        data.blocks()[block] & mask != 0
    }

    #[inline]
    fn check_position(&self, i: usize) {
        assert!(
            i < self.size_bits,
            "mapper produced position {i} for a {}-bit filter",
            self.size_bits
        );
    }

    #[inline]
    fn locate(&self, data: &BitVector, i: usize) -> (usize, u64) {
        self.check_position(i);
        debug_assert_eq!(data.len_blocks(), self.pool.blocks());
        (i / BLOCK_BITS, 1u64 << (BLOCK_BITS - 1 - i % BLOCK_BITS))
    }
}
