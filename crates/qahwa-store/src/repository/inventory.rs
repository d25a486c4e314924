//! # Inventory Repository
//!
//! Back-of-house stock: beans, milk, cups. Separate from menu products;
//! placing an order never touches these counts.
//!
//! ## Stock Buckets
//! ```text
//! current_stock <= 0         → OutOfStock
//! current_stock <= min_stock → LowStock
//! otherwise                  → InStock
//!
//! Buckets are derived on read (never stored) so they cannot drift.
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use qahwa_core::validation::{
    validate_bilingual, validate_category, validate_price_halalas, validate_restock_quantity,
    validate_stock,
};
use qahwa_core::{BilingualText, CoreError, CoreResult, InventoryItem, StockStatus, ValidationError};

use crate::ids::entity_id;
use crate::store::Shared;

// =============================================================================
// Input Types
// =============================================================================

/// Payload for adding a stock item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryItem {
    pub name: BilingualText,
    pub category: String,
    #[serde(default)]
    pub current_stock: i64,
    pub min_stock: i64,
    pub max_stock: i64,
    pub unit: String,
    pub cost_halalas: i64,
    pub price_halalas: i64,
    #[serde(default)]
    pub supplier: Option<String>,
}

/// Option-field patch. `current_stock` is deliberately absent; counts move
/// only through [`InventoryRepository::restock`] and
/// [`InventoryRepository::consume`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryUpdate {
    #[serde(default)]
    pub name: Option<BilingualText>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default)]
    pub max_stock: Option<i64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub cost_halalas: Option<i64>,
    #[serde(default)]
    pub price_halalas: Option<i64>,
    #[serde(default)]
    pub supplier: Option<String>,
}

/// List filter; set fields are AND-combined.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryFilter {
    #[serde(default)]
    pub category: Option<String>,
    /// Matches against the derived stock bucket.
    #[serde(default)]
    pub status: Option<StockStatus>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for back-of-house stock items.
pub struct InventoryRepository {
    shared: Arc<Shared>,
}

impl InventoryRepository {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Lists stock items matching the filter, in insertion order.
    pub fn list(&self, filter: &InventoryFilter) -> Vec<InventoryItem> {
        self.shared.read(|c| {
            c.inventory
                .iter()
                .filter(|i| {
                    filter
                        .category
                        .as_deref()
                        .map_or(true, |category| i.category == category)
                })
                .filter(|i| filter.status.map_or(true, |status| i.stock_status() == status))
                .cloned()
                .collect()
        })
    }

    /// Fetches a stock item by id.
    pub fn get(&self, id: &str) -> Option<InventoryItem> {
        self.shared
            .read(|c| c.inventory.iter().find(|i| i.id == id).cloned())
    }

    /// Adds a stock item.
    pub fn create(&self, new: NewInventoryItem) -> CoreResult<InventoryItem> {
        validate_bilingual("name", &new.name)?;
        validate_category(&new.category)?;
        validate_stock(new.current_stock)?;
        validate_stock(new.min_stock)?;
        validate_stock(new.max_stock)?;
        validate_price_halalas(new.cost_halalas)?;
        validate_price_halalas(new.price_halalas)?;

        let now = Utc::now();
        let item = InventoryItem {
            id: entity_id("inv"),
            name: new.name,
            category: new.category,
            current_stock: new.current_stock,
            min_stock: new.min_stock,
            max_stock: new.max_stock,
            unit: new.unit,
            cost_halalas: new.cost_halalas,
            price_halalas: new.price_halalas,
            supplier: new.supplier,
            last_restocked: None,
            created_at: now,
            updated_at: now,
        };

        self.shared.write(|c| c.inventory.push(item.clone()));
        debug!(item_id = %item.id, "Inventory item added");
        Ok(item)
    }

    /// Applies a patch to a stock item.
    pub fn update(&self, id: &str, patch: InventoryUpdate) -> CoreResult<InventoryItem> {
        if let Some(ref name) = patch.name {
            validate_bilingual("name", name)?;
        }
        if let Some(ref category) = patch.category {
            validate_category(category)?;
        }
        if let Some(min_stock) = patch.min_stock {
            validate_stock(min_stock)?;
        }
        if let Some(max_stock) = patch.max_stock {
            validate_stock(max_stock)?;
        }
        if let Some(cost) = patch.cost_halalas {
            validate_price_halalas(cost)?;
        }
        if let Some(price) = patch.price_halalas {
            validate_price_halalas(price)?;
        }

        let updated = self.shared.write(|c| -> CoreResult<InventoryItem> {
            let item = c
                .inventory
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(|| CoreError::not_found("Inventory item", id))?;

            if let Some(name) = patch.name {
                item.name = name;
            }
            if let Some(category) = patch.category {
                item.category = category;
            }
            if let Some(min_stock) = patch.min_stock {
                item.min_stock = min_stock;
            }
            if let Some(max_stock) = patch.max_stock {
                item.max_stock = max_stock;
            }
            if let Some(unit) = patch.unit {
                item.unit = unit;
            }
            if let Some(cost) = patch.cost_halalas {
                item.cost_halalas = cost;
            }
            if let Some(price) = patch.price_halalas {
                item.price_halalas = price;
            }
            if let Some(supplier) = patch.supplier {
                item.supplier = Some(supplier);
            }
            item.updated_at = Utc::now();

            Ok(item.clone())
        })?;

        debug!(item_id = %id, "Inventory item updated");
        Ok(updated)
    }

    /// Adds stock and stamps `last_restocked`.
    pub fn restock(&self, id: &str, quantity: i64) -> CoreResult<InventoryItem> {
        validate_restock_quantity(quantity)?;

        let updated = self.shared.write(|c| -> CoreResult<InventoryItem> {
            let item = c
                .inventory
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(|| CoreError::not_found("Inventory item", id))?;

            let now = Utc::now();
            item.current_stock += quantity;
            item.last_restocked = Some(now);
            item.updated_at = now;

            Ok(item.clone())
        })?;

        debug!(item_id = %id, quantity, stock = updated.current_stock, "Inventory restocked");
        Ok(updated)
    }

    /// Removes stock, rejecting draws past zero.
    pub fn consume(&self, id: &str, quantity: i64) -> CoreResult<InventoryItem> {
        if quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        let updated = self.shared.write(|c| {
            let item = c
                .inventory
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(|| CoreError::not_found("Inventory item", id))?;

            if quantity > item.current_stock {
                return Err(CoreError::InsufficientStock {
                    id: item.id.clone(),
                    available: item.current_stock,
                    requested: quantity,
                });
            }

            item.current_stock -= quantity;
            item.updated_at = Utc::now();
            Ok(item.clone())
        })?;

        debug!(item_id = %id, quantity, stock = updated.current_stock, "Inventory consumed");
        Ok(updated)
    }

    /// Removes a stock item.
    pub fn delete(&self, id: &str) -> CoreResult<()> {
        self.shared.write(|c| {
            let before = c.inventory.len();
            c.inventory.retain(|i| i.id != id);
            if c.inventory.len() == before {
                return Err(CoreError::not_found("Inventory item", id));
            }
            Ok(())
        })?;

        debug!(item_id = %id, "Inventory item removed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
