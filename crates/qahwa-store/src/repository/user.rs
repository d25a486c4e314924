//! # User Repository
//!
//! Customer profiles and loyalty balance maintenance.
//!
//! ## Balance Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  credit_points  - only way a balance grows; every credit pushes the    │
//! │                   expiry horizon to now + configured window            │
//! │  debits         - happen only inside the reward ledger (apply) and     │
//! │                   never here                                           │
//! │  purge          - explicit sweep zeroing balances whose horizon has    │
//! │                   passed; nothing expires implicitly on read           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use qahwa_core::validation::{validate_phone, validate_user_name};
use qahwa_core::{loyalty, CoreError, CoreResult, User, ValidationError};

use crate::ids::entity_id;
use crate::store::Shared;

// =============================================================================
// Input Types
// =============================================================================

/// Payload for registering a user.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Option-field patch. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer profiles.
pub struct UserRepository {
    shared: Arc<Shared>,
}

impl UserRepository {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Lists all users in registration order.
    pub fn list(&self) -> Vec<User> {
        self.shared.read(|c| c.users.to_vec())
    }

    /// Fetches a user by id.
    pub fn get(&self, id: &str) -> Option<User> {
        self.shared
            .read(|c| c.users.iter().find(|u| u.id == id).cloned())
    }

    /// Fetches a user by phone number (exact match).
    pub fn get_by_phone(&self, phone: &str) -> Option<User> {
        self.shared
            .read(|c| c.users.iter().find(|u| u.phone == phone).cloned())
    }

    /// Registers a user with a zero balance.
    pub fn create(&self, new: NewUser) -> CoreResult<User> {
        validate_user_name(&new.name)?;
        validate_phone(&new.phone)?;

        let now = Utc::now();
        let user = User {
            id: entity_id("user"),
            name: new.name,
            phone: new.phone,
            email: new.email,
            loyalty_points: 0,
            total_spent_halalas: 0,
            points_expire_at: None,
            created_at: now,
            updated_at: now,
        };

        self.shared.write(|c| c.users.push(user.clone()));
        debug!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Applies a patch to a user profile.
    pub fn update(&self, id: &str, patch: UserUpdate) -> CoreResult<User> {
        if let Some(ref name) = patch.name {
            validate_user_name(name)?;
        }
        if let Some(ref phone) = patch.phone {
            validate_phone(phone)?;
        }

        let updated = self.shared.write(|c| -> CoreResult<User> {
            let user = c
                .users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| CoreError::not_found("User", id))?;

            if let Some(name) = patch.name {
                user.name = name;
            }
            if let Some(phone) = patch.phone {
                user.phone = phone;
            }
            if let Some(email) = patch.email {
                user.email = Some(email);
            }
            user.updated_at = Utc::now();

            Ok(user.clone())
        })?;

        debug!(user_id = %id, "User updated");
        Ok(updated)
    }

    /// Removes a user.
    pub fn delete(&self, id: &str) -> CoreResult<()> {
        self.shared.write(|c| {
            let before = c.users.len();
            c.users.retain(|u| u.id != id);
            if c.users.len() == before {
                return Err(CoreError::not_found("User", id));
            }
            Ok(())
        })?;

        debug!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Credits points and pushes the expiry horizon forward.
    ///
    /// ## Rules
    /// - `points` must be positive; debits live in the reward ledger
    /// - Every credit resets `points_expire_at` to now + configured window
    pub fn credit_points(&self, id: &str, points: i64) -> CoreResult<User> {
        if points <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "points".to_string(),
            }
            .into());
        }

        let window = self.shared.config.loyalty.expiry_days;
        let updated = self.shared.write(|c| -> CoreResult<User> {
            let user = c
                .users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| CoreError::not_found("User", id))?;

            user.loyalty_points += points;
            user.points_expire_at = Some(loyalty::next_expiry(Utc::now(), window));
            user.updated_at = Utc::now();

            Ok(user.clone())
        })?;

        debug!(user_id = %id, points, balance = updated.loyalty_points, "Points credited");
        Ok(updated)
    }

    /// Zeroes every balance whose expiry horizon has passed.
    ///
    /// Returns the number of users swept. Callers drive this on whatever
    /// schedule they want; balances never expire implicitly on read.
    pub fn purge_expired_points(&self, now: DateTime<Utc>) -> usize {
        let swept = self.shared.write(|c| {
            let mut swept = 0;
            for user in c.users.iter_mut() {
                if loyalty::has_lapsed(user, now) {
                    user.loyalty_points = 0;
                    user.points_expire_at = None;
                    user.updated_at = now;
                    swept += 1;
                }
            }
            swept
        });

        if swept > 0 {
            info!(swept, "Expired loyalty balances purged");
        }
        swept
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use chrono::Duration;

    fn sample_user() -> NewUser {
        NewUser {
            name: "Aisha Al-Harbi".to_string(),
            phone: "0501234567".to_string(),
            email: Some("aisha@example.com".to_string()),
        }
    }

    #[test]
    fn test_create_and_lookup() {
        let repo = Store::empty().users();
        let created = repo.create(sample_user()).unwrap();

        assert!(created.id.starts_with("user_"));
        assert_eq!(created.loyalty_points, 0);
        assert!(created.points_expire_at.is_none());

        assert!(repo.get(&created.id).is_some());
        let by_phone = repo.get_by_phone("0501234567").unwrap();
        assert_eq!(by_phone.id, created.id);
        assert!(repo.get_by_phone("0599999999").is_none());
    }

    #[test]
    fn test_create_rejects_bad_phone() {
        let repo = Store::empty().users();
        let mut new = sample_user();
        new.phone = "not a phone!".to_string();
        assert!(repo.create(new).is_err());
    }

    #[test]
    fn test_update_patches_profile() {
        let repo = Store::empty().users();
        let created = repo.create(sample_user()).unwrap();

        let updated = repo
            .update(
                &created.id,
                UserUpdate {
                    name: Some("Aisha N. Al-Harbi".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Aisha N. Al-Harbi");
        assert_eq!(updated.phone, "0501234567");
    }

    #[test]
    fn test_delete() {
        let repo = Store::empty().users();
        let created = repo.create(sample_user()).unwrap();
        repo.delete(&created.id).unwrap();
        assert!(repo.get(&created.id).is_none());
        assert!(repo.delete(&created.id).is_err());
    }

    #[test]
    fn test_credit_points_adds_and_sets_expiry() {
        let repo = Store::empty().users();
        let created = repo.create(sample_user()).unwrap();

        let updated = repo.credit_points(&created.id, 100).unwrap();
        assert_eq!(updated.loyalty_points, 100);

        let expires = updated.points_expire_at.unwrap();
        let expected = Utc::now() + Duration::days(30);
        assert!((expires - expected).num_minutes().abs() < 5);

        // Credits accumulate
        assert_eq!(repo.credit_points(&created.id, 50).unwrap().loyalty_points, 150);
    }

    #[test]
    fn test_credit_points_rejects_non_positive() {
        let repo = Store::empty().users();
        let created = repo.create(sample_user()).unwrap();
        assert!(repo.credit_points(&created.id, 0).is_err());
        assert!(repo.credit_points(&created.id, -10).is_err());
        assert_eq!(repo.get(&created.id).unwrap().loyalty_points, 0);
    }

    #[test]
    fn test_purge_sweeps_only_lapsed_balances() {
        let repo = Store::empty().users();
        let lapsed = repo.create(sample_user()).unwrap();
        let fresh = repo
            .create(NewUser {
                name: "Omar Nasser".to_string(),
                phone: "0559876543".to_string(),
                email: None,
            })
            .unwrap();

        repo.credit_points(&lapsed.id, 100).unwrap();
        repo.credit_points(&fresh.id, 100).unwrap();

        // Nothing has lapsed yet
        assert_eq!(repo.purge_expired_points(Utc::now()), 0);

        // A month later both horizons have passed
        let swept = repo.purge_expired_points(Utc::now() + Duration::days(31));
        assert_eq!(swept, 2);
        assert_eq!(repo.get(&lapsed.id).unwrap().loyalty_points, 0);
        assert!(repo.get(&lapsed.id).unwrap().points_expire_at.is_none());

        // Zero balances are never swept again
        assert_eq!(
            repo.purge_expired_points(Utc::now() + Duration::days(62)),
            0
        );
    }
}
