//! Collision pre-filter for uniqueness-constrained fields.

use std::future::Future;

use seedforge_core::{SeedError, StoreError};

/// Default collision budget, matching `SeedConfig::uniqueness_attempts`.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Generate candidates until `exists` reports a free value.
///
/// `exists` must be a read-only probe; this function has no other side
/// effects. Note this is only a pre-filter: the store's unique constraint
/// remains the authoritative signal, and the batch factory retries the
/// resulting `Conflict` if a concurrent writer wins the race.
pub async fn resolve_unique<V, G, E, Fut>(
    mut generate: G,
    exists: E,
    max_attempts: u32,
) -> Result<V, SeedError>
where
    G: FnMut() -> V,
    E: Fn(&V) -> Fut,
    Fut: Future<Output = Result<bool, StoreError>>,
{
    for _ in 0..max_attempts {
        let candidate = generate();
        if !exists(&candidate).await? {
            return Ok(candidate);
        }
    }
    Err(SeedError::UniquenessExhausted {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn returns_first_free_candidate() {
        let counter = Cell::new(0u32);
        let value = resolve_unique(
            || {
                counter.set(counter.get() + 1);
                counter.get()
            },
            |candidate| {
                let taken = *candidate < 3;
                async move { Ok(taken) }
            },
            50,
        )
        .await
        .unwrap();
        assert_eq!(value, 3);
        assert_eq!(counter.get(), 3);
    }

    #[tokio::test]
    async fn exhausts_after_max_attempts() {
        let counter = Cell::new(0u32);
        let err = resolve_unique(
            || {
                counter.set(counter.get() + 1);
                counter.get()
            },
            |_| async { Ok(true) },
            5,
        )
        .await
        .unwrap_err();
        assert_eq!(err, SeedError::UniquenessExhausted { attempts: 5 });
        assert_eq!(counter.get(), 5);
    }

    #[tokio::test]
    async fn probe_errors_propagate() {
        let err: Result<u32, _> = resolve_unique(
            || 1,
            |_| async { Err(StoreError::Timeout) },
            50,
        )
        .await;
        assert_eq!(err.unwrap_err(), SeedError::Store(StoreError::Timeout));
    }
}
