//! Record generators for Seedforge fixtures.
//!
//! Each entity module exposes a `generate`-style function that fills every
//! field from an override or a domain default, resolves foreign keys against
//! caller-supplied parent collections, and computes derived fields. Weighted
//! random policies are fixed constants: they are a reproducibility contract.

pub mod access_logs;
pub mod catalog;
pub mod licenses;
pub mod organizations;
pub mod policy;
pub mod resolver;
pub mod rng;
pub mod users;

pub use resolver::resolve_unique;
pub use rng::{hash_seed, seeded_rng};
