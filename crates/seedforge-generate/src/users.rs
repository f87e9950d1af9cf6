//! User generator.

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::internet::en::Password;
use fake::faker::name::en::Name;
use rand::Rng;
use sha2::{Digest, Sha256};
use rand::seq::IndexedRandom;
use uuid::Uuid;

use seedforge_core::{Department, Organization, Role, SeedError, User};

use crate::organizations::hex_suffix;

#[derive(Debug, Clone, Default)]
pub struct UserOverrides {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role_code: Option<String>,
    pub organization_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub active: Option<bool>,
    pub admin: Option<bool>,
}

/// Produce one user attached to an existing active organization.
///
/// Fails with `DependencyMissing` when there is no organization or role to
/// reference; 70% of users land in one of their org's departments when the
/// org has any.
pub fn user<R: Rng + ?Sized>(
    rng: &mut R,
    organizations: &[Organization],
    departments: &[Department],
    roles: &[Role],
    overrides: &UserOverrides,
) -> Result<User, SeedError> {
    if organizations.is_empty() {
        return Err(SeedError::DependencyMissing(
            "active organizations".to_string(),
        ));
    }
    if roles.is_empty() {
        return Err(SeedError::DependencyMissing("roles".to_string()));
    }

    let org_id = match overrides.organization_id {
        Some(id) => id,
        None => {
            organizations
                .choose(rng)
                .map(|org| org.id)
                // Non-empty slice checked above.
                .unwrap_or_default()
        }
    };

    let department_id = overrides.department_id.or_else(|| {
        let own: Vec<&Department> = departments
            .iter()
            .filter(|dept| dept.organization_id == org_id)
            .collect();
        if own.is_empty() || !rng.random_bool(0.7) {
            None
        } else {
            own.choose(rng).map(|dept| dept.id)
        }
    });

    let name: String = overrides
        .name
        .clone()
        .unwrap_or_else(|| Name().fake_with_rng(rng));
    let email = overrides
        .email
        .clone()
        .unwrap_or_else(|| email_for(rng, &name));
    let role_code = match overrides.role_code.clone() {
        Some(code) => code,
        None => roles
            .choose(rng)
            .map(|role| role.code.clone())
            .unwrap_or_default(),
    };

    let password: String = Password(12..24).fake_with_rng(rng);

    Ok(User {
        id: Uuid::new_v4(),
        email,
        name,
        password_hash: password_hash(&password),
        role_code,
        organization_id: Some(org_id),
        department_id,
        active: overrides.active.unwrap_or_else(|| rng.random_bool(0.95)),
        admin: overrides.admin.unwrap_or(false),
        created_at: Utc::now() - Duration::days(rng.random_range(0..365)),
    })
}

/// SHA-256 hex digest of a plaintext password.
pub fn password_hash(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Email derived from the display name plus a random suffix, keeping the
/// candidate space wide enough for the uniqueness resolver.
pub fn email_for<R: Rng + ?Sized>(rng: &mut R, name: &str) -> String {
    let local: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '.' })
        .collect();
    format!("{}.{}@example.test", local.trim_matches('.'), hex_suffix(rng, 4).to_lowercase())
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
            code: "ORG-TEST".to_string(),
            name: "Test Org".to_string(),
            tier: OrgTier::Business,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn role() -> Role {
        Role {
            id: Uuid::new_v4(),
            code: "viewer".to_string(),
            name: "Viewer".to_string(),
            description: String::new(),
            permission_codes: vec![],
        }
    }

    #[test]
    fn missing_parents_are_terminal() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let err = user(&mut rng, &[], &[], &[role()], &UserOverrides::default()).unwrap_err();
        assert!(matches!(err, SeedError::DependencyMissing(_)));

        let err = user(&mut rng, &[org()], &[], &[], &UserOverrides::default()).unwrap_err();
        assert!(matches!(err, SeedError::DependencyMissing(_)));
    }

    #[test]
    fn user_references_a_supplied_organization() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let parent = org();
        let generated = user(
            &mut rng,
            &[parent.clone()],
            &[],
            &[role()],
            &UserOverrides::default(),
        )
        .unwrap();
        assert_eq!(generated.organization_id, Some(parent.id));
        assert_eq!(generated.role_code, "viewer");
        assert!(generated.email.contains("@example.test"));
        assert!(!generated.admin);
    }
}
