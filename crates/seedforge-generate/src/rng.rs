//! Deterministic RNG derivation.
//!
//! When a run seed is configured, each seeder derives its own stream by
//! hashing the run seed with a stable key, so adding or reordering seeders
//! does not perturb the records another seeder produces.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// FNV-1a style mix of a base seed and a stream key.
pub fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// RNG for one named generation stream; entropy-seeded when `seed` is unset.
pub fn seeded_rng(seed: Option<u64>, key: &str) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(hash_seed(seed, key)),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}
