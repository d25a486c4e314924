//! # Order Repository
//!
//! Order placement and lifecycle.
//!
//! ## Placement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      place(): one write closure                         │
//! │                                                                         │
//! │   cart lines + applied rewards                                          │
//! │        │ aggregate (empty cart → EmptyCart, nothing else runs)          │
//! │        ▼                                                                │
//! │   route to a branch (preferred → nearest pickup → shortest queue)       │
//! │        │ closed everywhere → NoOpenBranches, cart untouched             │
//! │        ▼                                                                │
//! │   Order snapshot ── lines frozen, totals frozen, estimate frozen        │
//! │        │                                                                │
//! │        ├── one Redemption row per applied reward                        │
//! │        ├── cart emptied (lines AND applied rewards)                     │
//! │        └── user credited: earned points + Points-kind bonuses,          │
//! │            total_spent grows by the charged amount                      │
//! │                                                                         │
//! │   All of it commits together or none of it does. Placement never        │
//! │   touches product stock.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use qahwa_core::cart::summarize;
use qahwa_core::routing::{estimate_minutes, route_order};
use qahwa_core::{
    loyalty, CartItem, CartReward, CoreError, CoreResult, GeoPoint, Money, Order, OrderItem,
    OrderStatus, OrderType, Redemption, RewardKind,
};

use crate::ids::entity_id;
use crate::store::Shared;

// =============================================================================
// Input Types
// =============================================================================

/// Payload for placing an order from the user's cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderRequest {
    pub order_type: OrderType,
    /// Branch the customer asked for. Honored only while it is open.
    #[serde(default)]
    pub preferred_branch_id: Option<String>,
    /// Customer position for nearest-branch pickup routing.
    #[serde(default)]
    pub customer_location: Option<GeoPoint>,
    /// Label from the payment layer ("cash", "card", ...). Stored as-is.
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// AND-combined listing filter. Default matches every order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderFilter {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for placed orders.
pub struct OrderRepository {
    shared: Arc<Shared>,
}

impl OrderRepository {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Places an order from everything in the user's cart.
    ///
    /// ## Rules
    /// - An empty cart is rejected before any routing happens
    /// - Synthesized free-reward lines are frozen into the order at
    ///   zero price
    /// - Applied rewards become `Redemption` history rows; the points were
    ///   already debited at apply time
    /// - Earned points: charged total × configured rate, plus the face
    ///   value of every Points-kind reward consumed
    /// - Any error leaves the cart, balances, and history untouched
    pub fn place(&self, user_id: &str, req: OrderRequest) -> CoreResult<Order> {
        let points_per_riyal = self.shared.config.loyalty.points_per_riyal;
        let expiry_window = self.shared.config.loyalty.expiry_days;
        let base_minutes = self.shared.config.orders.base_prep_minutes;
        let per_item_minutes = self.shared.config.orders.prep_minutes_per_item;

        let order = self.shared.write(|c| {
            let user_idx = c
                .users
                .iter()
                .position(|u| u.id == user_id)
                .ok_or_else(|| CoreError::not_found("User", user_id))?;

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

            let summary = summarize(&items, &rewards);
            if summary.is_empty() {
                return Err(CoreError::EmptyCart {
                    user_id: user_id.to_string(),
                });
            }

            let mut queue_depths: HashMap<String, usize> = HashMap::new();
            for order in c.orders.iter().filter(|o| o.status.is_queued()) {
                *queue_depths.entry(order.branch_id.clone()).or_insert(0) += 1;
            }
            let branch = route_order(
                &c.branches,
                req.preferred_branch_id.as_deref(),
                req.customer_location,
                req.order_type,
                &queue_depths,
            )?
            .clone();

            let now = Utc::now();
            let order = Order {
                id: entity_id("order"),
                user_id: user_id.to_string(),
                branch_id: branch.id.clone(),
                branch_name: branch.name.clone(),
                items: summary
                    .items
                    .iter()
                    .map(|i| OrderItem {
                        product_id: i.product_id.clone(),
                        name: i.name.clone(),
                        unit_price_halalas: i.unit_price_halalas,
                        quantity: i.quantity,
                        customization: i.customization.clone(),
                    })
                    .collect(),
                subtotal_halalas: summary.subtotal_halalas,
                discount_halalas: summary.total_discounts_halalas,
                total_halalas: summary.final_total_halalas,
                status: OrderStatus::Pending,
                order_type: req.order_type,
                payment_method: req.payment_method,
                payment_status: "pending".to_string(),
                estimated_minutes: estimate_minutes(
                    summary.total_items,
                    base_minutes,
                    per_item_minutes,
                ),
                created_at: now,
                updated_at: now,
            };

            let mut bonus_points = 0;
            for reward in &rewards {
                c.redemptions.push(Redemption {
                    id: entity_id("rdm"),
                    user_id: user_id.to_string(),
                    reward_id: reward.reward_id.clone(),
                    order_id: order.id.clone(),
                    redeemed_at: now,
                });
                if reward.kind == RewardKind::Points {
                    bonus_points += reward.value;
                }
            }

            c.cart_items.retain(|i| i.user_id != user_id);
            c.cart_rewards.retain(|r| r.user_id != user_id);

            let earned = loyalty::points_earned(
                Money::from_halalas(order.total_halalas),
                points_per_riyal,
            ) + bonus_points;
            let user = &mut c.users[user_idx];
            user.total_spent_halalas += order.total_halalas;
            if earned > 0 {
                user.loyalty_points += earned;
                user.points_expire_at = Some(loyalty::next_expiry(now, expiry_window));
            }
            user.updated_at = now;

            c.orders.push(order.clone());
            Ok(order)
        })?;

        info!(
            order_id = %order.id,
            user_id = %user_id,
            branch_id = %order.branch_id,
            total = %order.total(),
            "Order placed"
        );
        Ok(order)
    }

    /// Fetches an order by id.
    pub fn get(&self, id: &str) -> Option<Order> {
        self.shared
            .read(|c| c.orders.iter().find(|o| o.id == id).cloned())
    }

    /// Lists orders matching the filter, oldest first.
    pub fn list(&self, filter: &OrderFilter) -> Vec<Order> {
        self.shared.read(|c| {
            c.orders
                .iter()
                .filter(|o| {
                    filter.user_id.as_ref().map_or(true, |u| &o.user_id == u)
                        && filter.branch_id.as_ref().map_or(true, |b| &o.branch_id == b)
                        && filter.status.map_or(true, |s| o.status == s)
                })
                .cloned()
                .collect()
        })
    }

    /// Advances an order along its lifecycle.
    ///
    /// Only the legal steps are accepted; terminal orders never change.
    pub fn update_status(&self, id: &str, next: OrderStatus) -> CoreResult<Order> {
        let updated = self.shared.write(|c| {
            let order = c
                .orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or_else(|| CoreError::not_found("Order", id))?;
            if !order.status.can_transition_to(next) {
                return Err(CoreError::InvalidStatusTransition {
                    from: order.status,
                    to: next,
                });
            }
            order.status = next;
            order.updated_at = Utc::now();
            Ok(order.clone())
        })?;

        info!(order_id = %id, status = %next, "Order status changed");
        Ok(updated)
    }

    /// Records the payment layer's status string verbatim.
    pub fn set_payment_status(&self, id: &str, status: &str) -> CoreResult<Order> {
        let updated = self.shared.write(|c| -> CoreResult<Order> {
            let order = c
                .orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or_else(|| CoreError::not_found("Order", id))?;
            order.payment_status = status.to_string();
            order.updated_at = Utc::now();
            Ok(order.clone())
        })?;

        debug!(order_id = %id, payment_status = %status, "Payment status recorded");
        Ok(updated)
    }

    /// How many orders a branch currently has in its kitchen queue
    /// (pending or preparing).
    pub fn queue_depth(&self, branch_id: &str) -> usize {
        self.shared.read(|c| {
            c.orders
                .iter()
                .filter(|o| o.branch_id == branch_id && o.status.is_queued())
                .count()
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::branch::NewBranch;
    use crate::repository::cart::AddToCart;
    use crate::repository::product::{NewProduct, ProductUpdate};
    use crate::repository::reward::NewReward;
    use crate::repository::user::NewUser;
    use crate::store::Store;
    use chrono::NaiveTime;
    use qahwa_core::{BilingualText, WorkingHours};

    fn hours() -> WorkingHours {
        WorkingHours {
            opens_at: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            closes_at: NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
        }
    }

    fn branch(en: &str, ar: &str, latitude: f64, longitude: f64) -> NewBranch {
        NewBranch {
            name: BilingualText::new(en, ar),
            address: BilingualText::new(format!("{en} District"), format!("حي {ar}")),
            phone: "0112345678".to_string(),
            location: GeoPoint {
                latitude,
                longitude,
            },
            working_hours: hours(),
            is_open: true,
        }
    }

    /// Store with one 250-point user, a latte and a croissant in the menu,
    /// and two open Riyadh branches (Olaya, Diriyah).
    fn order_fixture() -> (Store, String) {
        let store = Store::empty();
        let user = store
            .users()
            .create(NewUser {
                name: "Aisha Al-Harbi".to_string(),
                phone: "0501234567".to_string(),
                email: None,
            })
            .unwrap();
        store.users().credit_points(&user.id, 250).unwrap();

        for (en, ar, price) in [
            ("Latte", "لاتيه", 1700),
            ("Croissant", "كرواسون", 1200),
        ] {
            store
                .products()
                .create(NewProduct {
                    name: BilingualText::new(en, ar),
                    description: None,
                    category: "menu".to_string(),
                    price_halalas: price,
                    stock: 50,
                })
                .unwrap();
        }
        store
            .branches()
            .create(branch("Olaya", "العليا", 24.6944, 46.6846))
            .unwrap();
        store
            .branches()
            .create(branch("Diriyah", "الدرعية", 24.7372, 46.5753))
            .unwrap();

        (store, user.id)
    }

    fn product_id(store: &Store, en: &str) -> String {
        store
            .products()
            .list(&Default::default())
            .into_iter()
            .find(|p| p.name.en == en)
            .unwrap()
            .id
    }

    fn branch_id(store: &Store, en: &str) -> String {
        store
            .branches()
            .list()
            .into_iter()
            .find(|b| b.name.en == en)
            .unwrap()
            .id
    }

    /// Latte ×2 + croissant ×1: 46.00 SR, 3 items, 14-minute estimate.
    fn fill_cart(store: &Store, user_id: &str) {
        for (en, quantity) in [("Latte", 2), ("Croissant", 1)] {
            store
                .carts()
                .add_item(
                    user_id,
                    AddToCart {
                        product_id: product_id(store, en),
                        quantity,
                        customization: None,
                    },
                )
                .unwrap();
        }
    }

    fn pickup() -> OrderRequest {
        OrderRequest {
            order_type: OrderType::Pickup,
            preferred_branch_id: None,
            customer_location: None,
            payment_method: None,
        }
    }

    #[test]
    fn test_place_routes_to_nearest_and_freezes_totals() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);

        // Just south of Olaya, far from Diriyah
        let order = store
            .orders()
            .place(
                &user_id,
                OrderRequest {
                    customer_location: Some(GeoPoint {
                        latitude: 24.7000,
                        longitude: 46.6900,
                    }),
                    ..pickup()
                },
            )
            .unwrap();

        assert!(order.id.starts_with("order_"));
        assert_eq!(order.branch_id, branch_id(&store, "Olaya"));
        assert_eq!(order.branch_name.en, "Olaya");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.subtotal_halalas, 4600);
        assert_eq!(order.discount_halalas, 0);
        assert_eq!(order.total_halalas, 4600);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, "pending");
        // 5 base + 3 × 3 items
        assert_eq!(order.estimated_minutes, 14);
    }

    #[test]
    fn test_place_rejects_empty_cart() {
        let (store, user_id) = order_fixture();
        assert!(matches!(
            store.orders().place(&user_id, pickup()),
            Err(CoreError::EmptyCart { .. })
        ));
        assert!(matches!(
            store.orders().place("user_missing", pickup()),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_place_with_all_branches_closed_changes_nothing() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);
        for b in store.branches().list() {
            store.branches().set_open(&b.id, false).unwrap();
        }

        assert!(matches!(
            store.orders().place(&user_id, pickup()),
            Err(CoreError::NoOpenBranches)
        ));

        // Cart and balance survive the failed placement
        assert_eq!(store.carts().summary(&user_id).unwrap().item_count, 2);
        assert_eq!(store.users().get(&user_id).unwrap().loyalty_points, 250);
        assert!(store.orders().list(&Default::default()).is_empty());
    }

    #[test]
    fn test_place_consumes_cart_and_rewards() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);

        let reward = store
            .rewards()
            .create(NewReward {
                name: BilingualText::new("10 SR Off", "خصم ١٠ ريال"),
                description: None,
                kind: RewardKind::Discount,
                value: 1000,
                points_required: 100,
                is_active: true,
                min_order_halalas: None,
                max_usage_per_user: None,
                expiry_days: None,
            })
            .unwrap();
        store.rewards().apply(&user_id, &reward.id).unwrap();

        let order = store.orders().place(&user_id, pickup()).unwrap();
        assert_eq!(order.subtotal_halalas, 4600);
        assert_eq!(order.discount_halalas, 1000);
        assert_eq!(order.total_halalas, 3600);

        // Cart emptied, reward consumed into history
        assert!(store.carts().summary(&user_id).unwrap().is_empty());
        assert_eq!(store.rewards().times_redeemed(&user_id, &reward.id), 1);

        // 250 - 100 applied + 36 earned on the 36.00 SR charge
        let user = store.users().get(&user_id).unwrap();
        assert_eq!(user.loyalty_points, 186);
        assert_eq!(user.total_spent_halalas, 3600);
    }

    #[test]
    fn test_points_reward_pays_its_bonus_at_placement() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);

        let reward = store
            .rewards()
            .create(NewReward {
                name: BilingualText::new("50 Bonus Points", "٥٠ نقطة إضافية"),
                description: None,
                kind: RewardKind::Points,
                value: 50,
                points_required: 25,
                is_active: true,
                min_order_halalas: None,
                max_usage_per_user: None,
                expiry_days: None,
            })
            .unwrap();
        store.rewards().apply(&user_id, &reward.id).unwrap();
        assert_eq!(store.users().get(&user_id).unwrap().loyalty_points, 225);

        // Points rewards do not discount: full 46.00 SR charge
        let order = store.orders().place(&user_id, pickup()).unwrap();
        assert_eq!(order.total_halalas, 4600);

        // 225 + 46 earned + 50 bonus
        assert_eq!(store.users().get(&user_id).unwrap().loyalty_points, 321);
    }

    #[test]
    fn test_place_freezes_free_reward_line() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);

        let reward = store
            .rewards()
            .create(NewReward {
                name: BilingualText::new("Free Drink", "مشروب مجاني"),
                description: None,
                kind: RewardKind::FreeItem,
                value: 0,
                points_required: 150,
                is_active: true,
                min_order_halalas: None,
                max_usage_per_user: None,
                expiry_days: None,
            })
            .unwrap();
        store.rewards().apply(&user_id, &reward.id).unwrap();

        let order = store.orders().place(&user_id, pickup()).unwrap();
        assert_eq!(order.items.len(), 3);

        let free_line = &order.items[2];
        assert_eq!(free_line.unit_price_halalas, 0);
        assert_eq!(free_line.quantity, 1);
        assert_eq!(free_line.name.en, "Free Drink");
        // The free unit still counts toward preparation time: 5 + 3 × 4
        assert_eq!(order.estimated_minutes, 17);
    }

    #[test]
    fn test_open_preferred_branch_wins_over_distance() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);
        let diriyah = branch_id(&store, "Diriyah");

        let order = store
            .orders()
            .place(
                &user_id,
                OrderRequest {
                    preferred_branch_id: Some(diriyah.clone()),
                    customer_location: Some(GeoPoint {
                        latitude: 24.7000,
                        longitude: 46.6900,
                    }),
                    ..pickup()
                },
            )
            .unwrap();

        assert_eq!(order.branch_id, diriyah);
    }

    #[test]
    fn test_queue_balancing_without_location() {
        let (store, user_id) = order_fixture();
        let olaya = branch_id(&store, "Olaya");
        let diriyah = branch_id(&store, "Diriyah");

        // No location, no preference: ties go to the first branch
        fill_cart(&store, &user_id);
        let first = store.orders().place(&user_id, pickup()).unwrap();
        assert_eq!(first.branch_id, olaya);

        // Olaya now has one queued order, so the next goes to Diriyah
        fill_cart(&store, &user_id);
        let second = store.orders().place(&user_id, pickup()).unwrap();
        assert_eq!(second.branch_id, diriyah);

        assert_eq!(store.orders().queue_depth(&olaya), 1);
        assert_eq!(store.orders().queue_depth(&diriyah), 1);

        // Delivered orders leave the queue
        store
            .orders()
            .update_status(&first.id, OrderStatus::Preparing)
            .unwrap();
        store
            .orders()
            .update_status(&first.id, OrderStatus::Ready)
            .unwrap();
        store
            .orders()
            .update_status(&first.id, OrderStatus::Delivered)
            .unwrap();
        assert_eq!(store.orders().queue_depth(&olaya), 0);
    }

    #[test]
    fn test_status_machine_rejects_shortcuts() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);
        let order = store.orders().place(&user_id, pickup()).unwrap();

        // Pending cannot jump straight to Ready or Delivered
        assert!(matches!(
            store.orders().update_status(&order.id, OrderStatus::Ready),
            Err(CoreError::InvalidStatusTransition { .. })
        ));
        assert!(store
            .orders()
            .update_status(&order.id, OrderStatus::Delivered)
            .is_err());

        // The full legal path
        store
            .orders()
            .update_status(&order.id, OrderStatus::Preparing)
            .unwrap();
        store
            .orders()
            .update_status(&order.id, OrderStatus::Ready)
            .unwrap();
        let delivered = store
            .orders()
            .update_status(&order.id, OrderStatus::Delivered)
            .unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);

        // Terminal: nothing moves a delivered order
        assert!(store
            .orders()
            .update_status(&order.id, OrderStatus::Cancelled)
            .is_err());
    }

    #[test]
    fn test_cancelled_order_is_terminal() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);
        let order = store.orders().place(&user_id, pickup()).unwrap();

        store
            .orders()
            .update_status(&order.id, OrderStatus::Cancelled)
            .unwrap();
        assert!(store
            .orders()
            .update_status(&order.id, OrderStatus::Preparing)
            .is_err());
    }

    #[test]
    fn test_payment_status_stored_verbatim() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);
        let order = store.orders().place(&user_id, pickup()).unwrap();

        let updated = store
            .orders()
            .set_payment_status(&order.id, "PAID ref=TX-20260823-001")
            .unwrap();
        assert_eq!(updated.payment_status, "PAID ref=TX-20260823-001");
    }

    #[test]
    fn test_usage_cap_counts_consumed_orders() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);

        let reward = store
            .rewards()
            .create(NewReward {
                name: BilingualText::new("Weekly Free Drink", "مشروب أسبوعي مجاني"),
                description: None,
                kind: RewardKind::FreeItem,
                value: 0,
                points_required: 50,
                is_active: true,
                min_order_halalas: None,
                max_usage_per_user: Some(1),
                expiry_days: None,
            })
            .unwrap();
        store.rewards().apply(&user_id, &reward.id).unwrap();
        store.orders().place(&user_id, pickup()).unwrap();

        // Plenty of points, but the cap is spent
        fill_cart(&store, &user_id);
        assert!(matches!(
            store.rewards().apply(&user_id, &reward.id),
            Err(CoreError::RewardLimitReached { max_usage: 1, .. })
        ));
    }

    #[test]
    fn test_order_snapshot_outlives_catalog_changes() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);
        let order = store.orders().place(&user_id, pickup()).unwrap();

        let latte = product_id(&store, "Latte");
        store
            .products()
            .update(
                &latte,
                ProductUpdate {
                    price_halalas: Some(9900),
                    name: Some(BilingualText::new("Imperial Latte", "لاتيه إمبراطوري")),
                    ..Default::default()
                },
            )
            .unwrap();

        let frozen = store.orders().get(&order.id).unwrap();
        assert_eq!(frozen.items[0].name.en, "Latte");
        assert_eq!(frozen.items[0].unit_price_halalas, 1700);
        assert_eq!(frozen.total_halalas, 4600);
    }

    #[test]
    fn test_list_filters() {
        let (store, user_id) = order_fixture();
        fill_cart(&store, &user_id);
        let first = store.orders().place(&user_id, pickup()).unwrap();
        fill_cart(&store, &user_id);
        store.orders().place(&user_id, pickup()).unwrap();

        store
            .orders()
            .update_status(&first.id, OrderStatus::Preparing)
            .unwrap();

        assert_eq!(store.orders().list(&Default::default()).len(), 2);
        assert_eq!(
            store
                .orders()
                .list(&OrderFilter {
                    user_id: Some(user_id.clone()),
                    ..Default::default()
                })
                .len(),
            2
        );
        assert_eq!(
            store
                .orders()
                .list(&OrderFilter {
                    status: Some(OrderStatus::Preparing),
                    ..Default::default()
                })
                .len(),
            1
        );
        assert_eq!(
            store
                .orders()
                .list(&OrderFilter {
                    branch_id: Some(first.branch_id.clone()),
                    status: Some(OrderStatus::Pending),
                    ..Default::default()
                })
                .len(),
            0
        );
    }
}
