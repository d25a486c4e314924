//! # Cart Aggregation
//!
//! Pure aggregation of one user's cart lines and applied rewards into a
//! `CartSummary`. The store tier snapshots the inputs under its lock and
//! calls [`summarize`]; nothing here reads or writes shared state.
//!
//! ## Aggregation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        summarize(items, rewards)                        │
//! │                                                                         │
//! │  stored cart lines ─────────┬──► subtotal = Σ unit_price × quantity    │
//! │                             │                                           │
//! │  applied rewards ───────────┼──► discount = Σ discount rewards         │
//! │        │                    │                                           │
//! │        │ FreeItem kind      └──► total = max(0, subtotal − discount)   │
//! │        ▼                                                                │
//! │  synthesized zero-price lines (quantity 1, category "reward")          │
//! │  appended to the item list: derived every call, never stored           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Properties
//! - Pure and idempotent: same inputs always produce the same summary
//! - The charged total never goes below zero, however large the discounts
//! - `discount_halalas` always reports the full discount, even when clamped

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartItem, CartReward, RewardKind};

// =============================================================================
// Cart Summary
// =============================================================================

/// Aggregated view of a user's cart for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Stored lines followed by synthesized free-reward lines.
    pub items: Vec<CartItem>,
    /// Rewards currently applied to the cart.
    pub applied_rewards: Vec<CartReward>,
    /// Number of lines (free lines included).
    pub item_count: usize,
    /// Total quantity across all lines (free lines included).
    pub total_items: i64,
    /// Sum of stored line totals in halalas.
    pub subtotal_halalas: i64,
    /// Sum of all applied discounts in halalas (not clamped).
    pub total_discounts_halalas: i64,
    /// Charged amount: `max(0, subtotal - discounts)`.
    pub final_total_halalas: i64,
}

impl CartSummary {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_halalas(self.subtotal_halalas)
    }

    /// Returns the total discounts as Money.
    #[inline]
    pub fn total_discounts(&self) -> Money {
        Money::from_halalas(self.total_discounts_halalas)
    }

    /// Returns the charged total as Money.
    #[inline]
    pub fn final_total(&self) -> Money {
        Money::from_halalas(self.final_total_halalas)
    }

    /// Checks if the cart has no lines at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Aggregates cart lines and applied rewards into a summary.
///
/// ## Behavior
/// - Subtotal counts **stored** lines only; synthesized free lines are
///   zero-priced so they could never contribute anyway
/// - Each applied FreeItem reward appends one zero-price line of quantity 1
/// - The final total clamps at zero; a discount larger than the subtotal
///   reduces the payable amount to SR 0.00 and no further
///
/// ## Example
/// ```rust
/// use qahwa_core::cart::summarize;
///
/// let summary = summarize(&[], &[]);
/// assert_eq!(summary.total_items, 0);
/// assert_eq!(summary.final_total_halalas, 0);
/// assert!(summary.is_empty());
/// ```
pub fn summarize(items: &[CartItem], rewards: &[CartReward]) -> CartSummary {
    let mut all_items: Vec<CartItem> = items.to_vec();

    // Synthesize a free line per FreeItem reward. Timestamps come from the
    // reward application so repeated aggregation stays deterministic.
    for reward in rewards {
        if reward.kind == RewardKind::FreeItem {
            all_items.push(free_item_line(reward));
        }
    }

    let subtotal_halalas: i64 = items.iter().map(|i| i.line_total_halalas()).sum();
    let total_discounts_halalas: i64 = rewards.iter().map(|r| r.discount_halalas()).sum();
    let final_total_halalas = (subtotal_halalas - total_discounts_halalas).max(0);

    CartSummary {
        item_count: all_items.len(),
        total_items: all_items.iter().map(|i| i.quantity).sum(),
        subtotal_halalas,
        total_discounts_halalas,
        final_total_halalas,
        items: all_items,
        applied_rewards: rewards.to_vec(),
    }
}

/// Builds the zero-price line a FreeItem reward contributes.
fn free_item_line(reward: &CartReward) -> CartItem {
    CartItem {
        id: format!("{}_free", reward.id),
        user_id: reward.user_id.clone(),
        product_id: reward.reward_id.clone(),
        name: reward.name.clone(),
        unit_price_halalas: 0,
        quantity: 1,
        customization: None,
        category: "reward".to_string(),
        created_at: reward.applied_at,
        updated_at: reward.applied_at,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
