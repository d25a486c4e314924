//! # Cart Repository
//!
//! Open-cart lines per user, kept until an order consumes them.
//!
//! ## Line Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Cart Lines                                     │
//! │                                                                         │
//! │   add_item(product, qty, customization)                                 │
//! │        │                                                                │
//! │        ├── same product + IDENTICAL customization already in cart?      │
//! │        │      merge: quantity += qty  (snapshot stays as-is)            │
//! │        │      merged total > 99 → QuantityTooLarge, nothing changes     │
//! │        │                                                                │
//! │        └── otherwise: new line, SNAPSHOT of name/price/category         │
//! │               100 lines per user → CartTooLarge                         │
//! │                                                                         │
//! │   Snapshots freeze the menu at add time. A catalog re-price or          │
//! │   rename never reaches lines already in a cart.                         │
//! │                                                                         │
//! │   update_quantity(.., 0) removes the line. Negative is an error,       │
//! │   never a removal.                                                      │
//! │                                                                         │
//! │   clear() refunds every applied reward before dropping the lines.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use qahwa_core::cart::{summarize, CartSummary};
use qahwa_core::validation::validate_quantity;
use qahwa_core::{
    loyalty, CartItem, CartReward, CoreError, CoreResult, Customization, ValidationError,
    MAX_CART_ITEMS, MAX_ITEM_QUANTITY,
};

use crate::ids::entity_id;
use crate::store::Shared;

// =============================================================================
// Input Types
// =============================================================================

/// Payload for adding a product to a cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddToCart {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub customization: Option<Customization>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for per-user cart lines.
pub struct CartRepository {
    shared: Arc<Shared>,
}

impl CartRepository {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Adds a product to the user's cart, merging into an existing line
    /// when product and customization both match.
    ///
    /// The returned item is the stored line: merged quantity for a merge,
    /// a fresh snapshot otherwise.
    pub fn add_item(&self, user_id: &str, new: AddToCart) -> CoreResult<CartItem> {
        validate_quantity(new.quantity)?;

        let item = self.shared.write(|c| {
            if !c.users.iter().any(|u| u.id == user_id) {
                return Err(CoreError::not_found("User", user_id));
            }
            let product = c
                .products
                .iter()
                .find(|p| p.id == new.product_id)
                .ok_or_else(|| CoreError::not_found("Product", &new.product_id))?;
            if !product.is_active() {
                return Err(CoreError::ProductUnavailable {
                    product_id: product.id.clone(),
                });
            }
            let (name, unit_price, category) = (
                product.name.clone(),
                product.price_halalas,
                product.category.clone(),
            );

            if let Some(line) = c.cart_items.iter_mut().find(|i| {
                i.user_id == user_id
                    && i.product_id == new.product_id
                    && i.customization == new.customization
            }) {
                let merged = line.quantity + new.quantity;
                if merged > MAX_ITEM_QUANTITY {
                    return Err(CoreError::QuantityTooLarge {
                        requested: merged,
                        max: MAX_ITEM_QUANTITY,
                    });
                }
                line.quantity = merged;
                line.updated_at = Utc::now();
                return Ok(line.clone());
            }

            let line_count = c.cart_items.iter().filter(|i| i.user_id == user_id).count();
            if line_count >= MAX_CART_ITEMS {
                return Err(CoreError::CartTooLarge {
                    max: MAX_CART_ITEMS,
                });
            }

            let now = Utc::now();
            let item = CartItem {
                id: entity_id("item"),
                user_id: user_id.to_string(),
                product_id: new.product_id,
                name,
                unit_price_halalas: unit_price,
                quantity: new.quantity,
                customization: new.customization,
                category,
                created_at: now,
                updated_at: now,
            };
            c.cart_items.push(item.clone());
            Ok(item)
        })?;

        debug!(
            user_id = %user_id,
            item_id = %item.id,
            quantity = item.quantity,
            "Cart line added"
        );
        Ok(item)
    }

    /// Sets the quantity of a cart line.
    ///
    /// Zero removes the line and returns `Ok(None)`. Negative values are
    /// rejected outright rather than treated as a removal.
    pub fn update_quantity(
        &self,
        user_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> CoreResult<Option<CartItem>> {
        if quantity < 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }
        if quantity == 0 {
            self.remove_item(user_id, item_id)?;
            return Ok(None);
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let updated = self.shared.write(|c| -> CoreResult<CartItem> {
            let line = c
                .cart_items
                .iter_mut()
                .find(|i| i.id == item_id && i.user_id == user_id)
                .ok_or_else(|| CoreError::not_found("Cart item", item_id))?;
            line.quantity = quantity;
            line.updated_at = Utc::now();
            Ok(line.clone())
        })?;

        debug!(user_id = %user_id, item_id = %item_id, quantity, "Cart line quantity set");
        Ok(Some(updated))
    }

    /// Removes a single line from the user's cart.
    pub fn remove_item(&self, user_id: &str, item_id: &str) -> CoreResult<()> {
        self.shared.write(|c| {
            let before = c.cart_items.len();
            c.cart_items
                .retain(|i| !(i.id == item_id && i.user_id == user_id));
            if c.cart_items.len() == before {
                return Err(CoreError::not_found("Cart item", item_id));
            }
            Ok(())
        })?;

        debug!(user_id = %user_id, item_id = %item_id, "Cart line removed");
        Ok(())
    }

    /// Empties the user's cart, refunding every applied reward.
    ///
    /// Returns the number of lines removed.
    pub fn clear(&self, user_id: &str) -> CoreResult<usize> {
        let window = self.shared.config.loyalty.expiry_days;
        let (removed, refunded) = self.shared.write(|c| {
            if !c.users.iter().any(|u| u.id == user_id) {
                return Err(CoreError::not_found("User", user_id));
            }

            let before = c.cart_items.len();
            c.cart_items.retain(|i| i.user_id != user_id);
            let removed = before - c.cart_items.len();

            let mut refunded = 0;
            c.cart_rewards.retain(|cr| {
                if cr.user_id == user_id {
                    refunded += cr.points_used;
                    false
                } else {
                    true
                }
            });

            if refunded > 0 {
                if let Some(user) = c.users.iter_mut().find(|u| u.id == user_id) {
                    user.loyalty_points += refunded;
                    user.points_expire_at = Some(loyalty::next_expiry(Utc::now(), window));
                    user.updated_at = Utc::now();
                }
            }

            Ok((removed, refunded))
        })?;

        debug!(user_id = %user_id, removed, refunded, "Cart cleared");
        Ok(removed)
    }

    /// Aggregates the user's cart into a summary with totals and any
    /// synthesized free-reward lines.
    pub fn summary(&self, user_id: &str) -> CoreResult<CartSummary> {
        self.shared.read(|c| {
            if !c.users.iter().any(|u| u.id == user_id) {
                return Err(CoreError::not_found("User", user_id));
            }
            let items: Vec<CartItem> = c
                .cart_items
                .iter()
                .filter(|i| i.user_id == user_id)
                .cloned()
                .collect();
            let rewards: Vec<CartReward> = c
                .cart_rewards
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect();
            Ok(summarize(&items, &rewards))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
