//! Explicit configuration for the seeding engine.
//!
//! Everything a seeder needs (bootstrap admin identity, retry and chunk
//! tuning, the deterministic RNG seed) is carried in this struct and passed
//! in at construction. The core never reads the process environment itself;
//! [`SeedConfig::from_env`] is a convenience for the composition root.

/// Tuning and bootstrap values shared by all seeders.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Bootstrap admin account, preserved by admin-aware clean operations.
    pub admin_email: String,
    pub admin_name: String,
    pub admin_password: String,
    /// Concurrent fan-out width inside one batch chunk.
    pub chunk_size: usize,
    /// Total attempts per record slot, backoff between them.
    pub max_retries: u32,
    /// Collision budget for the uniqueness resolver.
    pub uniqueness_attempts: u32,
    /// Deterministic RNG seed; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@seedforge.dev".to_string(),
            admin_name: "Bootstrap Admin".to_string(),
            admin_password: "change-me".to_string(),
            chunk_size: 10,
            max_retries: 3,
            uniqueness_attempts: 50,
            rng_seed: None,
        }
    }
}

impl SeedConfig {
    /// Read the admin bootstrap overrides from the environment, falling back
    /// to defaults. Meant for the CLI entry point only.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(email) = std::env::var("SEEDFORGE_ADMIN_EMAIL") {
            config.admin_email = email;
        }
        if let Ok(name) = std::env::var("SEEDFORGE_ADMIN_NAME") {
            config.admin_name = name;
        }
        if let Ok(password) = std::env::var("SEEDFORGE_ADMIN_PASSWORD") {
            config.admin_password = password;
        }
        if let Ok(seed) = std::env::var("SEEDFORGE_RNG_SEED") {
            config.rng_seed = seed.parse().ok();
        }
        config
    }
}
