//! Request, option, and result types exchanged across the seeding pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SeedError;

/// How many records to create and which per-record overrides to apply.
///
/// Overrides are positional: the record at index `i` receives
/// `overrides[i]` when present and pure defaults otherwise.
#[derive(Debug, Clone)]
pub struct GenerationRequest<O> {
    pub count: usize,
    pub overrides: Vec<O>,
}

impl<O> GenerationRequest<O> {
    pub fn of(count: usize) -> Self {
        Self {
            count,
            overrides: Vec::new(),
        }
    }

    pub fn with_overrides(count: usize, overrides: Vec<O>) -> Self {
        Self { count, overrides }
    }

    pub fn override_for(&self, index: usize) -> Option<&O> {
        self.overrides.get(index)
    }
}

/// One slot that exhausted its retries, keyed by its global batch index.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    pub index: usize,
    pub error: SeedError,
}

/// Partitioned result of one batch creation call.
///
/// `succeeded.len() + failed.len()` always equals the requested count.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutcome<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<RecordFailure>,
}

impl<T> GenerationOutcome<T> {
    pub fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Fold another chunk's outcome in, rebasing its failure indices by
    /// `offset` so they stay global.
    pub fn absorb(&mut self, other: GenerationOutcome<T>, offset: usize) {
        self.succeeded.extend(other.succeeded);
        self.failed.extend(other.failed.into_iter().map(|mut failure| {
            failure.index += offset;
            failure
        }));
    }
}

/// Knobs consumed from the CLI layer and threaded down to seeders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedOptions {
    /// Override the seeder's default record count.
    pub count: Option<usize>,
    /// Scale applied to default counts; presets like quick-dev shrink it.
    pub count_multiplier: f64,
    /// Skip pre-validation entirely.
    pub force: bool,
    /// Skip the post-seed validation pass.
    pub skip_validation: bool,
    /// Also create the fixed named scenario records.
    pub include_presets: bool,
    /// Access-log volume knob: entries generated per license.
    pub logs_per_license: Option<usize>,
    /// Access-log spread: distribute timestamps over this many past days.
    pub realistic_days: Option<i64>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            count: None,
            count_multiplier: 1.0,
            force: false,
            skip_validation: false,
            include_presets: false,
            logs_per_license: None,
            realistic_days: None,
        }
    }
}

impl SeedOptions {
    /// Effective record count for a seeder with the given default.
    pub fn effective_count(&self, default_count: usize) -> usize {
        match self.count {
            Some(count) => count,
            None => ((default_count as f64) * self.count_multiplier).ceil() as usize,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Keep the bootstrap admin account when cleaning users.
    pub preserve_admin: bool,
}

/// Creation counters reported by a successful seed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCounts {
    pub created: u64,
    pub existing: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<u64>,
}

impl SeedCounts {
    pub fn created(count: u64) -> Self {
        Self {
            created: count,
            ..Self::default()
        }
    }

    pub fn merge(&mut self, other: SeedCounts) {
        self.created += other.created;
        self.existing += other.existing;
        if other.updated.is_some() {
            self.updated = Some(self.updated.unwrap_or(0) + other.updated.unwrap_or(0));
        }
    }
}

/// Structured outcome of one seeder's `seed` or `clean` call.
///
/// Seeders never raise: logical and exceptional failures both land here so
/// the orchestrator can treat them identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeederResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SeedCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SeederResult {
    pub fn ok(message: impl Into<String>, data: SeedCounts) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>, error: &SeedError) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// One seeder's entry in an orchestrator run, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeederRun {
    pub seeder: String,
    pub result: SeederResult,
}

/// Aggregate outcome of an orchestrator operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorResult {
    pub success: bool,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    pub results: Vec<SeederRun>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrchestratorResult {
    pub fn result_for(&self, seeder: &str) -> Option<&SeederResult> {
        self.results
            .iter()
            .find(|run| run.seeder == seeder)
            .map(|run| &run.result)
    }
}

/// Configuration for a full orchestrator run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Explicit seeder name list; `None` uses the default dependency order.
    pub seeders: Option<Vec<String>>,
    /// Requested but unsupported: degrades to serial with a warning.
    pub parallel: bool,
    pub options: SeedOptions,
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_rebases_failure_indices() {
        let mut merged: GenerationOutcome<u32> = GenerationOutcome::new();
        merged.absorb(
            GenerationOutcome {
                succeeded: vec![1, 2],
                failed: vec![RecordFailure {
                    index: 2,
                    error: SeedError::TransactionTimeout,
                }],
            },
            0,
        );
        merged.absorb(
            GenerationOutcome {
                succeeded: vec![3],
                failed: vec![RecordFailure {
                    index: 1,
                    error: SeedError::TransactionTimeout,
                }],
            },
            10,
        );

        let indices: Vec<usize> = merged.failed.iter().map(|failure| failure.index).collect();
        assert_eq!(indices, vec![2, 11]);
    }

    #[test]
    fn effective_count_scales_defaults_only() {
        let scaled = SeedOptions {
            count_multiplier: 0.25,
            ..SeedOptions::default()
        };
        assert_eq!(scaled.effective_count(25), 7);

        let explicit = SeedOptions {
            count: Some(3),
            count_multiplier: 0.25,
            ..SeedOptions::default()
        };
        assert_eq!(explicit.effective_count(25), 3);
    }

    #[test]
    fn run_report_serializes_duration_as_millis() {
        let report = OrchestratorResult {
            success: true,
            duration: Duration::from_millis(1530),
            results: vec![SeederRun {
                seeder: "organizations".to_string(),
                result: SeederResult::ok("done", SeedCounts::default()),
            }],
            error: None,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["duration"], 1530);
        assert!(json.get("error").is_none());
        assert_eq!(json["results"][0]["seeder"], "organizations");
    }
}
