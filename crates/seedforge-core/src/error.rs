use thiserror::Error;

/// Errors surfaced by a [`crate::store::FixtureStore`] implementation.
///
/// Variants carry strings rather than source errors so outcomes stay
/// cloneable into per-record failure reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("operation timed out")]
    Timeout,
    #[error("unique constraint violated: {constraint}")]
    Conflict { constraint: String },
    #[error("query failed: {0}")]
    Query(String),
}

/// Errors emitted by generators, the batch factory, and seeders.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeedError {
    /// Persistence unreachable. Fatal at the seeder boundary.
    #[error("store unreachable: {0}")]
    Connection(String),
    /// A generated or persisted record failed an integrity check.
    #[error("record failed validation: {0}")]
    Validation(String),
    /// The uniqueness resolver ran out of attempts for a natural key.
    #[error("unique value space exhausted after {attempts} attempts")]
    UniquenessExhausted { attempts: u32 },
    /// A referenced parent collection is empty. Retrying cannot help.
    #[error("missing dependency: {0}")]
    DependencyMissing(String),
    /// The scoped transaction exceeded its server-side bound.
    #[error("transaction timed out")]
    TransactionTimeout,
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Requested seeder is not registered. A configuration bug, so this is
    /// the one error the orchestrator lets propagate.
    #[error("unknown seeder '{0}'")]
    UnknownSeeder(String),
}

impl SeedError {
    /// Whether the batch factory should retry the slot after this error.
    ///
    /// Everything transient is retried; a missing parent collection is
    /// terminal because another attempt cannot manufacture the dependency,
    /// and an unknown seeder is a configuration bug.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            SeedError::DependencyMissing(_) | SeedError::UnknownSeeder(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_missing_is_not_retryable() {
        assert!(!SeedError::DependencyMissing("organizations".into()).is_retryable());
        assert!(SeedError::TransactionTimeout.is_retryable());
        assert!(SeedError::Validation("bad email".into()).is_retryable());
        assert!(
            SeedError::Store(StoreError::Conflict {
                constraint: "organizations_code_key".into()
            })
            .is_retryable()
        );
    }
}
