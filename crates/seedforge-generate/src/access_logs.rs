//! Access-log generator.

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::internet::en::IPv4;
use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

use seedforge_core::{AccessLog, License, LogAction, SeedError, User};

use crate::policy::pick_weighted;

/// Action mix observed in real traffic; fixed for reproducibility.
pub const ACTION_BUCKETS: &[(u32, LogAction)] = &[
    (60, LogAction::Validate),
    (20, LogAction::Activate),
    (10, LogAction::Renew),
    (10, LogAction::RevokeCheck),
];

pub const DEFAULT_REALISTIC_DAYS: i64 = 30;

#[derive(Debug, Clone, Default)]
pub struct AccessLogOverrides {
    pub license_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub action: Option<LogAction>,
}

/// Produce one log entry for an existing license/user pair, timestamped
/// within the past `realistic_days` days.
pub fn access_log<R: Rng + ?Sized>(
    rng: &mut R,
    licenses: &[License],
    users: &[User],
    realistic_days: i64,
    overrides: &AccessLogOverrides,
) -> Result<AccessLog, SeedError> {
    if licenses.is_empty() {
        return Err(SeedError::DependencyMissing("licenses".to_string()));
    }
    if users.is_empty() {
        return Err(SeedError::DependencyMissing("active users".to_string()));
    }

    let license = match overrides.license_id {
        Some(id) => licenses.iter().find(|l| l.id == id),
        None => licenses.choose(rng),
    }
    .ok_or_else(|| SeedError::DependencyMissing("licenses".to_string()))?;

    // Prefer the license holder; fall back to any active user.
    let user_id = match overrides.user_id {
        Some(id) => id,
        None => license
            .holder_id
            .or_else(|| users.choose(rng).map(|u| u.id))
            .unwrap_or_default(),
    };

    let window_minutes = realistic_days.max(1) * 24 * 60;
    let occurred_at = Utc::now() - Duration::minutes(rng.random_range(0..window_minutes));

    Ok(AccessLog {
        id: Uuid::new_v4(),
        license_id: license.id,
        user_id,
        occurred_at,
        action: overrides
            .action
            .unwrap_or_else(|| *pick_weighted(rng, ACTION_BUCKETS)),
        ip: IPv4().fake_with_rng(rng),
    })
}
