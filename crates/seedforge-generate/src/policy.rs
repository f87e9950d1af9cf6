//! Weighted random policies shared by the entity generators.

use rand::Rng;

/// Pick a bucket proportionally to its weight.
///
/// Buckets must be non-empty; weights need not sum to 100. The fall-through
/// arm returns the last bucket so boundary rolls stay in range.
pub fn pick_weighted<'a, T, R: Rng + ?Sized>(rng: &mut R, buckets: &'a [(u32, T)]) -> &'a T {
    let total: u32 = buckets.iter().map(|(weight, _)| *weight).sum();
    let mut roll = rng.random_range(0..total.max(1));
    for (weight, value) in buckets {
        if roll < *weight {
            return value;
        }
        roll -= weight;
    }
    &buckets[buckets.len() - 1].1
}

/// Uniform draw from an inclusive monetary range, rounded to cents.
pub fn amount_in<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    let raw = rng.random_range(min..=max);
    (raw * 100.0).round() / 100.0
}
