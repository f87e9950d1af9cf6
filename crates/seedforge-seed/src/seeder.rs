//! Seeder lifecycle base.
//!
//! Concrete seeders implement the `do_*` hooks; the provided `seed`/`clean`
//! wrappers run the standard lifecycle (connect-check → pre-validate →
//! seed → post-validate) with duration timing and structured logging, and
//! convert every raised error into a failed [`SeederResult`]. The
//! orchestrator therefore observes logical and exceptional failures
//! identically; `seed` and `clean` never raise.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use seedforge_core::{
    CleanOptions, FixtureStore, SeedCounts, SeedError, SeedOptions, SeederResult,
};

/// Lifecycle phase, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeederPhase {
    Idle,
    Connecting,
    PreValidating,
    Seeding,
    PostValidating,
    Done,
    Failed,
}

impl fmt::Display for SeederPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeederPhase::Idle => "idle",
            SeederPhase::Connecting => "connecting",
            SeederPhase::PreValidating => "pre-validating",
            SeederPhase::Seeding => "seeding",
            SeederPhase::PostValidating => "post-validating",
            SeederPhase::Done => "done",
            SeederPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[async_trait]
pub trait Seeder: Send + Sync {
    /// Unique registration name.
    fn name(&self) -> &'static str;

    /// Advisory dependency metadata. Execution order is the orchestrator's
    /// fixed list; prerequisites are ensured by that ordering, not by a
    /// scheduler.
    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    fn store(&self) -> &dyn FixtureStore;

    /// Entity-specific seeding. Errors raised here are contained by `seed`.
    async fn do_seed(&self, options: &SeedOptions) -> Result<SeedCounts, SeedError>;

    /// Entity-specific cleanup returning the number of removed records.
    async fn do_clean(&self, options: &CleanOptions) -> Result<u64, SeedError>;

    /// Read-only entity counts.
    async fn stats(&self) -> Result<BTreeMap<String, u64>, SeedError>;

    /// Pre-seed hook. The default detects existing data and proceeds
    /// regardless; stricter policies can override and fail instead.
    async fn pre_validation(&self, _options: &SeedOptions) -> Result<(), SeedError> {
        let stats = self.stats().await?;
        let existing: u64 = stats.values().sum();
        if existing > 0 {
            info!(seeder = self.name(), existing, "existing data detected, proceeding");
        }
        Ok(())
    }

    /// Post-seed integrity check. The default passes once any stat count is
    /// positive. Failures here only warn; they never fail the seed.
    async fn validate(&self) -> Result<bool, SeedError> {
        let stats = self.stats().await?;
        Ok(stats.values().any(|count| *count > 0))
    }

    async fn seed(&self, options: &SeedOptions) -> SeederResult {
        let started = Instant::now();
        let name = self.name();

        debug!(seeder = name, phase = %SeederPhase::Connecting, "seed lifecycle");
        if let Err(error) = self.store().ping().await {
            let error = SeedError::Connection(error.to_string());
            warn!(seeder = name, phase = %SeederPhase::Failed, %error, "store unreachable");
            return SeederResult::failed(format!("{name}: store unreachable"), &error);
        }

        if options.force {
            debug!(seeder = name, "pre-validation skipped (force)");
        } else {
            debug!(seeder = name, phase = %SeederPhase::PreValidating, "seed lifecycle");
            if let Err(error) = self.pre_validation(options).await {
                warn!(seeder = name, phase = %SeederPhase::Failed, %error, "pre-validation failed");
                return SeederResult::failed(format!("{name}: pre-validation failed"), &error);
            }
        }

        debug!(seeder = name, phase = %SeederPhase::Seeding, "seed lifecycle");
        match self.do_seed(options).await {
            Ok(counts) => {
                if !options.skip_validation {
                    debug!(seeder = name, phase = %SeederPhase::PostValidating, "seed lifecycle");
                    match self.validate().await {
                        Ok(true) => {}
                        Ok(false) => {
                            warn!(seeder = name, "post-seed validation found no data")
                        }
                        Err(error) => {
                            warn!(seeder = name, %error, "post-seed validation errored")
                        }
                    }
                }
                let elapsed = started.elapsed();
                info!(
                    seeder = name,
                    phase = %SeederPhase::Done,
                    created = counts.created,
                    existing = counts.existing,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "seed finished"
                );
                SeederResult::ok(
                    format!(
                        "{name}: created {}, existing {}",
                        counts.created, counts.existing
                    ),
                    counts,
                )
            }
            Err(error) => {
                warn!(seeder = name, phase = %SeederPhase::Failed, %error, "seed failed");
                SeederResult::failed(format!("{name}: seed failed"), &error)
            }
        }
    }

    async fn clean(&self, options: &CleanOptions) -> SeederResult {
        let started = Instant::now();
        let name = self.name();

        if let Err(error) = self.store().ping().await {
            let error = SeedError::Connection(error.to_string());
            warn!(seeder = name, %error, "store unreachable");
            return SeederResult::failed(format!("{name}: store unreachable"), &error);
        }

        match self.do_clean(options).await {
            Ok(removed) => {
                info!(
                    seeder = name,
                    removed,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "clean finished"
                );
                SeederResult::ok(format!("{name}: removed {removed}"), SeedCounts::default())
            }
            Err(error) => {
                warn!(seeder = name, %error, "clean failed");
                SeederResult::failed(format!("{name}: clean failed"), &error)
            }
        }
    }
}
