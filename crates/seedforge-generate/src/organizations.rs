//! Organization and department generators.

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::company::en::CompanyName;
use rand::Rng;
use uuid::Uuid;

use seedforge_core::{Department, OrgTier, Organization};

use crate::policy::pick_weighted;

/// Tier mix for randomly generated organizations.
const TIER_BUCKETS: &[(u32, OrgTier)] = &[
    (50, OrgTier::Starter),
    (35, OrgTier::Business),
    (15, OrgTier::Enterprise),
];

const DEPARTMENT_NAMES: &[&str] = &[
    "Engineering",
    "Sales",
    "Support",
    "Finance",
    "Operations",
    "Marketing",
    "Legal",
    "Research",
];

#[derive(Debug, Clone, Default)]
pub struct OrganizationOverrides {
    pub code: Option<String>,
    pub name: Option<String>,
    pub tier: Option<OrgTier>,
    pub active: Option<bool>,
}

/// Random short code of the form `ORG-4F2A81`.
pub fn org_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("ORG-{}", hex_suffix(rng, 6))
}

/// Produce one organization from overrides and domain defaults.
///
/// 90% of generated organizations are active so dependent generators have a
/// populated pool to draw from.
pub fn organization<R: Rng + ?Sized>(
    rng: &mut R,
    overrides: &OrganizationOverrides,
) -> Organization {
    let code = overrides.code.clone().unwrap_or_else(|| org_code(rng));
    let name = overrides
        .name
        .clone()
        .unwrap_or_else(|| CompanyName().fake_with_rng(rng));
    let tier = overrides
        .tier
        .unwrap_or_else(|| *pick_weighted(rng, TIER_BUCKETS));
    let active = overrides.active.unwrap_or_else(|| rng.random_bool(0.9));
    let created_at = Utc::now() - Duration::days(rng.random_range(0..730));

    Organization {
        id: Uuid::new_v4(),
        code,
        name,
        tier,
        active,
        created_at,
    }
}

/// 1–4 departments for one organization, codes scoped by the org code.
pub fn departments_for<R: Rng + ?Sized>(rng: &mut R, org: &Organization) -> Vec<Department> {
    let count = rng.random_range(1..=4usize);
    let mut names: Vec<&str> = DEPARTMENT_NAMES.to_vec();
    (0..count)
        .map(|index| {
            let name = if names.is_empty() {
                format!("Department {}", index + 1)
            } else {
                names.remove(rng.random_range(0..names.len())).to_string()
            };
            Department {
                id: Uuid::new_v4(),
                code: format!("DEP-{}-{:02}", org.code, index + 1),
                name,
                organization_id: org.id,
            }
        })
        .collect()
}

pub(crate) fn hex_suffix<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    const HEX: &[u8] = b"0123456789ABCDEF";
    (0..len)
        .map(|_| HEX[rng.random_range(0..HEX.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn overrides_win_over_defaults() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let org = organization(
            &mut rng,
            &OrganizationOverrides {
                code: Some("ORG-FIXED".to_string()),
                active: Some(false),
                ..Default::default()
            },
        );
        assert_eq!(org.code, "ORG-FIXED");
        assert!(!org.active);
        assert!(!org.name.is_empty());
    }

    #[test]
    fn departments_stay_within_bounds_and_scope() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let org = organization(&mut rng, &OrganizationOverrides::default());
        for _ in 0..20 {
            let departments = departments_for(&mut rng, &org);
            assert!((1..=4).contains(&departments.len()));
            for dept in &departments {
                assert_eq!(dept.organization_id, org.id);
                assert!(dept.code.starts_with(&format!("DEP-{}", org.code)));
            }
        }
    }
}
