//! Recycling pool for fixed-length bit-vector buffers.
//!
//! A vector handed out by [`BitVectorPool::acquire`] is always all-zero. Vectors
//! come back either when the [`PooledVector`] guard drops or through an explicit
//! [`BitVectorPool::release`]; both paths zero every block before the buffer is
//! reused.
use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};

/// Ordered bits stored most-significant-bit first in 64-bit blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitVector(Box<[u64]>);

impl BitVector {
    pub fn zeroed(blocks: usize) -> Self {
        Self(vec![0u64; blocks].into_boxed_slice())
    }

    pub fn blocks(&self) -> &[u64] {
        &self.0
    }

    pub fn blocks_mut(&mut self) -> &mut [u64] {
        &mut self.0
    }

    pub fn len_blocks(&self) -> usize {
        self.0.len()
    }

    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|b| b.count_ones()).sum()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    pub fn clear(&mut self) {
        self.0.fill(0);
    }
}

/// Free list of zeroed vectors, all with the same block count.
///
/// Each pool is owned by one engine; nothing is shared between instances.
#[derive(Debug)]
pub struct BitVectorPool {
    blocks: usize,
    free: Mutex<Vec<BitVector>>,
}

impl BitVectorPool {
    pub fn new(blocks: usize) -> Self {
        Self { blocks, free: Mutex::new(Vec::new()) }
    }

    /// Block count of every vector this pool hands out.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Number of vectors currently waiting in the free list.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    /// Take a zeroed vector, allocating when the free list is empty.
    ///
    /// The guard returns the vector on drop. Call [`PooledVector::detach`] to
    /// keep it beyond the guard's scope.
    pub fn acquire(&self) -> PooledVector<'_> {
        let popped = self.free.lock().pop();
        let vector = popped.unwrap_or_else(|| BitVector::zeroed(self.blocks));
        PooledVector { pool: self, vector: Some(vector) }
    }

    /// Zero `v` and put it back on the free list.
    ///
    /// # Panics
    ///
    /// Panics if `v` was not sized for this pool.
    pub fn release(&self, mut v: BitVector) {
        assert_eq!(
            v.len_blocks(),
            self.blocks,
            "released vector has {} blocks, pool expects {}",
            v.len_blocks(),
            self.blocks
        );
        v.clear();
        self.free.lock().push(v);
    }

    /// Prime the free list with `n` vectors.
    pub fn preallocate(&self, n: usize) {
        let held: Vec<BitVector> = (0..n).map(|_| self.acquire().detach()).collect();
        for v in held {
            self.release(v);
        }
    }
}

/// Scoped ownership of a pooled vector.
#[derive(Debug)]
pub struct PooledVector<'a> {
    pool: &'a BitVectorPool,
    vector: Option<BitVector>,
}

impl PooledVector<'_> {
    /// Take the vector out of the pool's lifecycle. It is not returned on drop.
    pub fn detach(mut self) -> BitVector {
        self.vector.take().expect("pooled vector already taken")
    }
}

impl Deref for PooledVector<'_> {
    type Target = BitVector;

    fn deref(&self) -> &BitVector {
        self.vector.as_ref().expect("pooled vector already taken")
    }
}

impl DerefMut for PooledVector<'_> {
    fn deref_mut(&mut self) -> &mut BitVector {
        self.vector.as_mut().expect("pooled vector already taken")
    }
}

impl Drop for PooledVector<'_> {
    fn drop(&mut self) {
        if let Some(v) = self.vector.take() {
            self.pool.release(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_after_release_is_zeroed() {
        let pool = BitVectorPool::new(3);
        {
            let mut v = pool.acquire();
            v.blocks_mut()[0] = u64::MAX;
            v.blocks_mut()[2] = 0xdead_beef;
        }
        assert_eq!(pool.idle(), 1);
        let v = pool.acquire();
        assert_eq!(pool.idle(), 0);
        assert_eq!(v.len_blocks(), 3);
        assert!(v.is_zero());
    }

    #[test]
    fn detached_vector_is_not_returned() {
        let pool = BitVectorPool::new(1);
        let mut kept = pool.acquire().detach();
        kept.blocks_mut()[0] = 7;
        assert_eq!(pool.idle(), 0);
        pool.release(kept);
        assert_eq!(pool.idle(), 1);
        assert!(pool.acquire().is_zero());
    }

    #[test]
    fn preallocate_primes_free_list() {
        let pool = BitVectorPool::new(2);
        pool.preallocate(5);
        assert_eq!(pool.idle(), 5);
        let held: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        assert_eq!(pool.idle(), 0);
        assert!(held.iter().all(|v| v.is_zero()));
    }

    #[test]
    #[should_panic(expected = "pool expects 2")]
    fn release_rejects_foreign_size() {
        let pool = BitVectorPool::new(2);
        pool.release(BitVector::zeroed(1));
    }
}
