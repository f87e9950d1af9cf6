//! Concurrency-bounded, retrying bulk record creation.
//!
//! A batch is partitioned into fixed-size chunks; every slot in a chunk runs
//! generate → persist → validate concurrently, retrying transient failures
//! with exponential backoff. Slots settle independently: one failure never
//! aborts its siblings, and the caller always gets a full partition of the
//! requested count into successes and indexed failures.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use rand::Rng;
use tracing::{debug, warn};

use seedforge_core::{
    GenerationOutcome, GenerationRequest, RecordFailure, SeedConfig, SeedError, StoreError,
};

pub const DEFAULT_CHUNK_SIZE: usize = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_millis(1000);
const MAX_JITTER_MS: u64 = 1000;

/// One entity type's generate/persist/validate pipeline.
///
/// `persist` must run inside exactly one scoped transaction. `validate` is
/// the post-create integrity check; a failure there counts as a failed
/// attempt and re-enters the retry path.
#[async_trait]
pub trait RecordFactory: Send + Sync {
    type Record: Send;
    type Overrides: Send + Sync;

    async fn generate(
        &self,
        index: usize,
        overrides: Option<&Self::Overrides>,
    ) -> Result<Self::Record, SeedError>;

    async fn persist(&self, record: Self::Record) -> Result<Self::Record, SeedError>;

    async fn validate(&self, record: &Self::Record) -> Result<(), SeedError> {
        let _ = record;
        Ok(())
    }
}

/// Turns a [`GenerationRequest`] into a [`GenerationOutcome`].
#[derive(Debug, Clone)]
pub struct BatchFactory {
    chunk_size: usize,
    max_retries: u32,
    base_backoff: Duration,
    max_jitter_ms: u64,
}

impl Default for BatchFactory {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_MAX_RETRIES)
    }
}

impl BatchFactory {
    pub fn new(chunk_size: usize, max_retries: u32) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            max_retries: max_retries.max(1),
            base_backoff: BASE_BACKOFF,
            max_jitter_ms: MAX_JITTER_MS,
        }
    }

    pub fn from_config(config: &SeedConfig) -> Self {
        Self::new(config.chunk_size, config.max_retries)
    }

    /// Shrink the backoff schedule. Intended for tests.
    pub fn with_base_backoff(mut self, base: Duration, max_jitter_ms: u64) -> Self {
        self.base_backoff = base;
        self.max_jitter_ms = max_jitter_ms;
        self
    }

    /// Create `request.count` records, never raising: individual failures
    /// land in the outcome's failure list with their global index. Chunk
    /// N+1 does not start before every slot of chunk N has settled.
    pub async fn create_batch<F: RecordFactory>(
        &self,
        factory: &F,
        request: &GenerationRequest<F::Overrides>,
    ) -> GenerationOutcome<F::Record> {
        let mut outcome = GenerationOutcome::new();
        let mut offset = 0;

        while offset < request.count {
            let width = self.chunk_size.min(request.count - offset);
            let tasks = (0..width).map(|slot| {
                let index = offset + slot;
                async move {
                    (
                        slot,
                        self.create_one(factory, index, request.override_for(index))
                            .await,
                    )
                }
            });

            let mut chunk = GenerationOutcome::new();
            for (slot, result) in join_all(tasks).await {
                match result {
                    Ok(record) => chunk.succeeded.push(record),
                    Err(error) => chunk.failed.push(RecordFailure { index: slot, error }),
                }
            }

            outcome.absorb(chunk, offset);
            offset += width;
            // Progress signal; consumers only log it.
            debug!(
                completed = offset,
                total = request.count,
                failed = outcome.failed.len(),
                "batch chunk settled"
            );
        }

        outcome
    }

    async fn create_one<F: RecordFactory>(
        &self,
        factory: &F,
        index: usize,
        overrides: Option<&F::Overrides>,
    ) -> Result<F::Record, SeedError> {
        let mut last_error = SeedError::Validation("no attempt was made".to_string());

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                tokio::time::sleep(self.backoff(attempt)).await;
            }
            match self.attempt(factory, index, overrides).await {
                Ok(record) => return Ok(record),
                Err(error) if !error.is_retryable() => return Err(error),
                Err(error) => {
                    warn!(index, attempt, retries = self.max_retries, %error, "record attempt failed");
                    last_error = error;
                }
            }
        }

        Err(last_error)
    }

    async fn attempt<F: RecordFactory>(
        &self,
        factory: &F,
        index: usize,
        overrides: Option<&F::Overrides>,
    ) -> Result<F::Record, SeedError> {
        let record = factory.generate(index, overrides).await?;
        let record = factory
            .persist(record)
            .await
            .map_err(|error| match error {
                SeedError::Store(StoreError::Timeout) => SeedError::TransactionTimeout,
                other => other,
            })?;
        factory.validate(&record).await?;
        Ok(record)
    }

    /// Delay before retry `n` (attempt `n + 1`): `2^(n-1) * base` plus
    /// random jitter up to one second.
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(2);
        let jitter = Duration::from_millis(rand::rng().random_range(0..=self.max_jitter_ms));
        self.base_backoff * 2u32.saturating_pow(exponent) + jitter
    }
}
