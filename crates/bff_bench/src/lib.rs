//! Synthetic corpora shared by the benchmarks.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `n` documents of `terms_per_doc` terms drawn from a `vocab`-word vocabulary.
pub fn synthetic_docs(
    n: usize,
    terms_per_doc: usize,
    vocab: usize,
    seed: u64,
) -> Vec<(u64, Vec<Vec<u8>>)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n as u64)
        .map(|id| {
            let terms = (0..terms_per_doc)
                .map(|_| format!("w{}", rng.random_range(0..vocab)).into_bytes())
                .collect();
            (id, terms)
        })
        .collect()
}
