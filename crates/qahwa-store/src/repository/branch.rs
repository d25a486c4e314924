//! # Branch Repository
//!
//! Café locations, posted hours, and the open/closed flag routing trusts.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use qahwa_core::validation::{validate_bilingual, validate_phone};
use qahwa_core::{BilingualText, Branch, CoreError, CoreResult, GeoPoint, WorkingHours};

use crate::ids::entity_id;
use crate::store::Shared;

// =============================================================================
// Input Types
// =============================================================================

/// Payload for adding a branch.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBranch {
    pub name: BilingualText,
    pub address: BilingualText,
    pub phone: String,
    pub location: GeoPoint,
    pub working_hours: WorkingHours,
    /// New branches default to accepting orders.
    #[serde(default = "default_is_open")]
    pub is_open: bool,
}

fn default_is_open() -> bool {
    true
}

/// Option-field patch. Absent fields stay unchanged; use
/// [`BranchRepository::set_open`] to toggle availability.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BranchUpdate {
    #[serde(default)]
    pub name: Option<BilingualText>,
    #[serde(default)]
    pub address: Option<BilingualText>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub working_hours: Option<WorkingHours>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for café branches.
pub struct BranchRepository {
    shared: Arc<Shared>,
}

impl BranchRepository {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Lists every branch in insertion order.
    pub fn list(&self) -> Vec<Branch> {
        self.shared.read(|c| c.branches.clone())
    }

    /// Lists branches currently accepting orders.
    pub fn open_branches(&self) -> Vec<Branch> {
        self.shared
            .read(|c| c.branches.iter().filter(|b| b.is_open).cloned().collect())
    }

    /// Fetches a branch by id.
    pub fn get(&self, id: &str) -> Option<Branch> {
        self.shared
            .read(|c| c.branches.iter().find(|b| b.id == id).cloned())
    }

    /// Adds a branch.
    pub fn create(&self, new: NewBranch) -> CoreResult<Branch> {
        validate_bilingual("name", &new.name)?;
        validate_bilingual("address", &new.address)?;
        validate_phone(&new.phone)?;

        let now = Utc::now();
        let branch = Branch {
            id: entity_id("branch"),
            name: new.name,
            address: new.address,
            phone: new.phone,
            location: new.location,
            working_hours: new.working_hours,
            is_open: new.is_open,
            created_at: now,
            updated_at: now,
        };

        self.shared.write(|c| c.branches.push(branch.clone()));
        debug!(branch_id = %branch.id, "Branch added");
        Ok(branch)
    }

    /// Applies a patch to a branch.
    pub fn update(&self, id: &str, patch: BranchUpdate) -> CoreResult<Branch> {
        if let Some(ref name) = patch.name {
            validate_bilingual("name", name)?;
        }
        if let Some(ref address) = patch.address {
            validate_bilingual("address", address)?;
        }
        if let Some(ref phone) = patch.phone {
            validate_phone(phone)?;
        }

        let updated = self.shared.write(|c| -> CoreResult<Branch> {
            let branch = c
                .branches
                .iter_mut()
                .find(|b| b.id == id)
                .ok_or_else(|| CoreError::not_found("Branch", id))?;

            if let Some(name) = patch.name {
                branch.name = name;
            }
            if let Some(address) = patch.address {
                branch.address = address;
            }
            if let Some(phone) = patch.phone {
                branch.phone = phone;
            }
            if let Some(location) = patch.location {
                branch.location = location;
            }
            if let Some(working_hours) = patch.working_hours {
                branch.working_hours = working_hours;
            }
            branch.updated_at = Utc::now();

            Ok(branch.clone())
        })?;

        debug!(branch_id = %id, "Branch updated");
        Ok(updated)
    }

    /// Opens or closes a branch for ordering.
    pub fn set_open(&self, id: &str, open: bool) -> CoreResult<Branch> {
        let updated = self.shared.write(|c| -> CoreResult<Branch> {
            let branch = c
                .branches
                .iter_mut()
                .find(|b| b.id == id)
                .ok_or_else(|| CoreError::not_found("Branch", id))?;

            branch.is_open = open;
            branch.updated_at = Utc::now();
            Ok(branch.clone())
        })?;

        info!(branch_id = %id, open, "Branch availability changed");
        Ok(updated)
    }

    /// Removes a branch. Existing orders keep their branch-name snapshot.
    pub fn delete(&self, id: &str) -> CoreResult<()> {
        self.shared.write(|c| {
            let before = c.branches.len();
            c.branches.retain(|b| b.id != id);
            if c.branches.len() == before {
                return Err(CoreError::not_found("Branch", id));
            }
            Ok(())
        })?;

        debug!(branch_id = %id, "Branch removed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
