//! License generator, including the fixed monetary tier policy.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use uuid::Uuid;

use seedforge_core::{License, Organization, SeedError, User};

use crate::organizations::hex_suffix;
use crate::policy::{amount_in, pick_weighted};

/// Monetary tier mix. These exact weights and bounds are a reproducibility
/// contract; do not retune them.
pub const AMOUNT_TIERS: &[(u32, (f64, f64))] = &[
    (30, (49.90, 199.90)),
    (40, (200.00, 999.90)),
    (25, (1000.00, 4999.90)),
    (5, (5000.00, 20000.00)),
];

/// Seat count mix, same contract as [`AMOUNT_TIERS`].
pub const SEAT_TIERS: &[(u32, (u32, u32))] = &[
    (50, (1, 5)),
    (30, (6, 25)),
    (15, (26, 100)),
    (5, (101, 500)),
];

#[derive(Debug, Clone, Default)]
pub struct LicenseOverrides {
    pub key: Option<String>,
    pub organization_id: Option<Uuid>,
    pub holder_id: Option<Uuid>,
    pub seats: Option<u32>,
    pub amount: Option<f64>,
    pub issued_at: Option<DateTime<Utc>>,
    /// `Some(None)` forces a perpetual license.
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

/// Random license key of the form `LIC-9B3C-0F7A-52E1`.
pub fn license_key<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "LIC-{}-{}-{}",
        hex_suffix(rng, 4),
        hex_suffix(rng, 4),
        hex_suffix(rng, 4)
    )
}

/// Produce one license bound to an existing organization.
///
/// 70% of licenses get a holder drawn from the org's users (falling back to
/// any user); 15% are perpetual. `expired` is derived from `expires_at` at
/// generation time.
pub fn license<R: Rng + ?Sized>(
    rng: &mut R,
    organizations: &[Organization],
    users: &[User],
    overrides: &LicenseOverrides,
) -> Result<License, SeedError> {
    if organizations.is_empty() {
        return Err(SeedError::DependencyMissing(
            "active organizations".to_string(),
        ));
    }

    let org_id = match overrides.organization_id {
        Some(id) => id,
        None => organizations
            .choose(rng)
            .map(|org| org.id)
            .unwrap_or_default(),
    };

    let holder_id = overrides.holder_id.or_else(|| {
        if users.is_empty() || !rng.random_bool(0.7) {
            return None;
        }
        let own: Vec<&User> = users
            .iter()
            .filter(|user| user.organization_id == Some(org_id))
            .collect();
        match own.choose(rng) {
            Some(user) => Some(user.id),
            None => users.choose(rng).map(|user| user.id),
        }
    });

    let amount = overrides.amount.unwrap_or_else(|| {
        let (min, max) = *pick_weighted(rng, AMOUNT_TIERS);
        amount_in(rng, min, max)
    });
    let seats = overrides.seats.unwrap_or_else(|| {
        let (min, max) = *pick_weighted(rng, SEAT_TIERS);
        rng.random_range(min..=max)
    });

    let now = Utc::now();
    let issued_at = overrides
        .issued_at
        .unwrap_or_else(|| now - Duration::days(rng.random_range(0..365)));
    let expires_at = match overrides.expires_at {
        Some(expiry) => expiry,
        None => {
            if rng.random_bool(0.15) {
                None
            } else {
                Some(issued_at + Duration::days(rng.random_range(30..730)))
            }
        }
    };

    Ok(License {
        id: Uuid::new_v4(),
        key: overrides.key.clone().unwrap_or_else(|| license_key(rng)),
        organization_id: org_id,
        holder_id,
        seats,
        amount,
        issued_at,
        expires_at,
        expired: License::is_expired(expires_at, now),
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use seedforge_core::OrgTier;

    fn org() -> Organization {
        Organization {
            id: Uuid::new_v4(),
            code: "ORG-LIC".to_string(),
            name: "Licensed Org".to_string(),
            tier: OrgTier::Enterprise,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn requires_an_organization_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let err = license(&mut rng, &[], &[], &LicenseOverrides::default()).unwrap_err();
        assert!(matches!(err, SeedError::DependencyMissing(_)));
    }

    #[test]
    fn amounts_stay_inside_the_tier_envelope() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let parent = org();
        for _ in 0..200 {
            let generated =
                license(&mut rng, &[parent.clone()], &[], &LicenseOverrides::default()).unwrap();
            assert!((49.90..=20000.00).contains(&generated.amount));
            assert!((1..=500).contains(&generated.seats));
            assert_eq!(generated.organization_id, parent.id);
        }
    }

    #[test]
    fn expiry_overrides_drive_the_derived_flag() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let parent = org();
        let past = license(
            &mut rng,
            &[parent.clone()],
            &[],
            &LicenseOverrides {
                expires_at: Some(Some(Utc::now() - Duration::days(2))),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(past.expired);

        let perpetual = license(
            &mut rng,
            &[parent],
            &[],
            &LicenseOverrides {
                expires_at: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!perpetual.expired);
        assert_eq!(perpetual.expires_at, None);
    }
}
