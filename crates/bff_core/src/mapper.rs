//! Position hashing: term bytes to a bit index in `[0, size_bits)`.
use std::fmt;

/// One Bloom probe. Must be deterministic and return a value below the
/// vector size it was built for.
pub trait PositionMapper: Send + Sync {
    fn position(&self, term: &[u8]) -> usize;
}

impl<F> PositionMapper for F
where
    F: Fn(&[u8]) -> usize + Send + Sync,
{
    #[inline]
    fn position(&self, term: &[u8]) -> usize {
        self(term)
    }
}

/// Builds the mapper for a given `(size_bits, seed)`; seeds run `0..k`.
pub trait MapperFactory: Send + Sync {
    fn create(&self, size_bits: usize, seed: usize) -> Box<dyn PositionMapper>;
}

impl<F> MapperFactory for F
where
    F: Fn(usize, usize) -> Box<dyn PositionMapper> + Send + Sync,
{
    fn create(&self, size_bits: usize, seed: usize) -> Box<dyn PositionMapper> {
        self(size_bits, seed)
    }
}

/// Seeded XXH64 reduced modulo the vector size.
#[derive(Clone, Copy, Debug)]
pub struct Xxh64Mapper {
    size_bits: u64,
    seed: u64,
}

impl Xxh64Mapper {
    pub fn new(size_bits: usize, seed: usize) -> Self {
        Self { size_bits: size_bits as u64, seed: seed as u64 }
    }
}

impl PositionMapper for Xxh64Mapper {
    #[inline]
    fn position(&self, term: &[u8]) -> usize {
        (xxhash_rust::xxh64::xxh64(term, self.seed) % self.size_bits) as usize
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh64Factory;

impl MapperFactory for Xxh64Factory {
    fn create(&self, size_bits: usize, seed: usize) -> Box<dyn PositionMapper> {
        Box::new(Xxh64Mapper::new(size_bits, seed))
    }
}

/// Ordered family of `k` mappers built with seeds `0..k`.
pub struct Mappers(Vec<Box<dyn PositionMapper>>);

impl Mappers {
    pub fn create(factory: &dyn MapperFactory, size_bits: usize, k: usize) -> Self {
        Self((0..k).map(|seed| factory.create(size_bits, seed)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn PositionMapper> {
        self.0.iter().map(|m| m.as_ref())
    }

    /// Every probe position for `term`, in mapper order.
    pub fn positions<'a>(&'a self, term: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
        self.iter().map(move |m| m.position(term))
    }
}

impl fmt::Debug for Mappers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mappers").field("k", &self.0.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xxh64_is_deterministic_and_in_range() {
        let m = Xxh64Mapper::new(10, 3);
        for word in ["hello", "world", "", "golang"] {
            let p = m.position(word.as_bytes());
            assert!(p < 10);
            assert_eq!(p, m.position(word.as_bytes()));
        }
    }

    #[test]
    fn seeds_give_different_families() {
        let family = Mappers::create(&Xxh64Factory, 1 << 20, 4);
        let probes: Vec<usize> = family.positions(b"hello").collect();
        assert_eq!(probes.len(), 4);
        let mut uniq = probes.clone();
        uniq.sort_unstable();
        uniq.dedup();
        assert_eq!(uniq.len(), 4, "seeds collided: {probes:?}");
    }

    #[test]
    fn closures_are_factories() {
        let factory = |size: usize, seed: usize| -> Box<dyn PositionMapper> {
            Box::new(move |term: &[u8]| (term.len() + seed) % size)
        };
        let family = Mappers::create(&factory, 8, 2);
        assert_eq!(family.positions(b"abc").collect::<Vec<_>>(), vec![3, 4]);
    }
}
