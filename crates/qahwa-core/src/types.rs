//! # Domain Types
//!
//! Core domain types used throughout Qahwa.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │     Reward      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name (ar/en)   │   │  status         │   │  kind           │       │
//! │  │  price_halalas  │   │  items          │   │  points_required│       │
//! │  │  stock          │   │  total_halalas  │   │  value          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartItem     │   │     Branch      │   │  InventoryItem  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  snapshots      │   │  location       │   │  current_stock  │       │
//! │  │  customization  │   │  working_hours  │   │  min/max_stock  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Cart lines and order lines freeze the product's name and unit price at the
//! moment they are created. Catalog edits never rewrite history.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::text::BilingualText;

// =============================================================================
// Product
// =============================================================================

/// Whether a product is offered on the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Shown on the menu and orderable.
    Active,
    /// Hidden from the menu (soft delete / seasonal items).
    Inactive,
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Active
    }
}

/// A menu item available for ordering.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (`prod_{millis}_{random}`).
    pub id: String,

    /// Display name in both languages.
    pub name: BilingualText,

    /// Optional longer description in both languages.
    pub description: Option<BilingualText>,

    /// Menu category ("hot_drinks", "cold_drinks", "pastries", ...).
    pub category: String,

    /// Price in halalas (smallest currency unit).
    pub price_halalas: i64,

    /// Current stock level. Informational for the menu; ordering does not
    /// decrement it.
    pub stock: i64,

    /// Whether the product is orderable.
    pub status: ProductStatus,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_halalas(self.price_halalas)
    }

    /// Checks if the product can be added to a cart.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

// =============================================================================
// Customization
// =============================================================================

/// Per-line drink customization.
///
/// Two cart lines for the same product merge only when their customizations
/// are identical; a latte with oat milk is not the same line as a plain one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customization {
    /// Cup size ("small", "medium", "large").
    pub size: Option<String>,

    /// Extra shots, syrups, alternative milks.
    #[serde(default)]
    pub extras: Vec<String>,

    /// Free-text barista note.
    pub notes: Option<String>,
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in a user's open cart.
/// Uses snapshot pattern to freeze product data at time of adding.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    /// Product name at time of adding (frozen).
    pub name: BilingualText,
    /// Unit price in halalas at time of adding (frozen).
    pub unit_price_halalas: i64,
    /// Quantity ordered.
    pub quantity: i64,
    /// Size/extras/notes chosen for this line.
    pub customization: Option<Customization>,
    /// Category at time of adding. Synthesized free-reward lines use
    /// `"reward"`.
    pub category: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_halalas(self.unit_price_halalas)
    }

    /// Line total in halalas (unit price × quantity, saturating).
    #[inline]
    pub fn line_total_halalas(&self) -> i64 {
        self.line_total().halalas()
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    /// Current loyalty point balance. Never negative.
    pub loyalty_points: i64,
    /// Lifetime spend in halalas, accumulated at order placement.
    pub total_spent_halalas: i64,
    /// Rolling expiry horizon; every point credit pushes it forward.
    /// `None` until the first credit.
    #[ts(as = "Option<String>")]
    pub points_expire_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns the lifetime spend as Money.
    #[inline]
    pub fn total_spent(&self) -> Money {
        Money::from_halalas(self.total_spent_halalas)
    }
}

// =============================================================================
// Reward
// =============================================================================

/// What redeeming a reward does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    /// Fixed discount off the order total. `value` is halalas.
    Discount,
    /// A free item added to the cart. `value` is unused.
    FreeItem,
    /// Bonus points credited when the order is placed. `value` is points.
    Points,
}

/// A redeemable loyalty reward in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reward {
    pub id: String,
    pub name: BilingualText,
    pub description: Option<BilingualText>,
    pub kind: RewardKind,
    /// Kind-dependent magnitude: halalas for Discount, points for Points,
    /// unused (0) for FreeItem.
    pub value: i64,
    /// Points debited from the user when the reward is applied.
    pub points_required: i64,
    pub is_active: bool,
    /// Minimum cart subtotal (halalas) required to apply.
    pub min_order_halalas: Option<i64>,
    /// Lifetime redemption cap per user. `None` = unlimited.
    pub max_usage_per_user: Option<u32>,
    /// Display-only countdown shown next to the reward.
    pub expiry_days: Option<u32>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Reward {
    /// Discount this reward takes off an order, zero for non-discount kinds.
    #[inline]
    pub fn discount(&self) -> Money {
        match self.kind {
            RewardKind::Discount => Money::from_halalas(self.value),
            _ => Money::zero(),
        }
    }
}

// =============================================================================
// Cart Reward
// =============================================================================

/// A reward applied to a user's open cart, awaiting order placement.
/// Snapshots the reward so later catalog edits cannot change what was
/// promised or break the points refund.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartReward {
    pub id: String,
    pub user_id: String,
    pub reward_id: String,
    /// Reward kind at time of applying (frozen).
    pub kind: RewardKind,
    /// Reward value at time of applying (frozen).
    pub value: i64,
    /// Reward name at time of applying (frozen).
    pub name: BilingualText,
    /// Points debited when this was applied; refunded exactly on removal.
    pub points_used: i64,
    #[ts(as = "String")]
    pub applied_at: DateTime<Utc>,
}

impl CartReward {
    /// Discount contribution of this applied reward in halalas.
    #[inline]
    pub fn discount_halalas(&self) -> i64 {
        match self.kind {
            RewardKind::Discount => self.value,
            _ => 0,
        }
    }
}

// =============================================================================
// Redemption
// =============================================================================

/// Usage history: one row per reward consumed by a placed order.
/// `max_usage_per_user` counts these, not currently-applied cart rewards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Redemption {
    pub id: String,
    pub user_id: String,
    pub reward_id: String,
    pub order_id: String,
    #[ts(as = "String")]
    pub redeemed_at: DateTime<Utc>,
}

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle of an order.
///
/// ```text
/// Pending ──► Preparing ──► Ready ──► Delivered
///    │            │
///    └────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, not yet picked up by the kitchen.
    Pending,
    /// Being made.
    Preparing,
    /// Waiting for pickup / courier.
    Ready,
    /// Handed over. Terminal.
    Delivered,
    /// Abandoned before it was ready. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Checks whether moving to `next` is a legal lifecycle step.
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Preparing)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Preparing, OrderStatus::Ready)
                | (OrderStatus::Preparing, OrderStatus::Cancelled)
                | (OrderStatus::Ready, OrderStatus::Delivered)
        )
    }

    /// Delivered and Cancelled orders never change again.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Orders in these states occupy the kitchen queue.
    pub const fn is_queued(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Preparing)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

// =============================================================================
// Order Type
// =============================================================================

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Customer collects from the branch.
    Pickup,
    /// Courier delivers. Delivery fees are out of scope.
    Delivery,
}

// =============================================================================
// Order Item
// =============================================================================

/// A line in a placed order. Immutable copy of the cart line it came from.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub product_id: String,
    /// Product name at time of placement (frozen).
    pub name: BilingualText,
    /// Unit price in halalas at time of placement (frozen).
    pub unit_price_halalas: i64,
    pub quantity: i64,
    pub customization: Option<Customization>,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_halalas(self.unit_price_halalas)
    }

    /// Line total in halalas (saturating).
    #[inline]
    pub fn line_total_halalas(&self) -> i64 {
        self.unit_price().multiply_quantity(self.quantity).halalas()
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed order routed to a branch.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub branch_id: String,
    /// Branch name at time of placement (frozen).
    pub branch_name: BilingualText,
    pub items: Vec<OrderItem>,
    pub subtotal_halalas: i64,
    pub discount_halalas: i64,
    /// Charged amount: `max(0, subtotal - discount)`.
    pub total_halalas: i64,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub payment_method: Option<String>,
    /// Opaque string from the (out of scope) payment layer.
    /// Stored verbatim, never interpreted.
    pub payment_status: String,
    /// Preparation estimate in minutes, fixed at placement.
    pub estimated_minutes: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_halalas(self.subtotal_halalas)
    }

    /// Returns the charged total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_halalas(self.total_halalas)
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Branch
// =============================================================================

/// A geographic coordinate (WGS84 degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Posted opening hours. Descriptive data for the menu screen; the
/// `is_open` flag on the branch is what routing trusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkingHours {
    #[ts(as = "String")]
    pub opens_at: NaiveTime,
    #[ts(as = "String")]
    pub closes_at: NaiveTime,
}

/// A physical café location.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Branch {
    pub id: String,
    pub name: BilingualText,
    pub address: BilingualText,
    pub phone: String,
    pub location: GeoPoint,
    pub working_hours: WorkingHours,
    /// Authoritative availability flag, toggled by staff.
    pub is_open: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Inventory
// =============================================================================

/// Derived stock level bucket. Never stored; always computed from the
/// current counts so it cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

/// A back-of-house stock item (beans, milk, cups, ...).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryItem {
    pub id: String,
    pub name: BilingualText,
    pub category: String,
    pub current_stock: i64,
    /// At or below this level the item reports LowStock.
    pub min_stock: i64,
    /// Reorder ceiling used by purchasing.
    pub max_stock: i64,
    /// Counting unit ("kg", "liter", "piece").
    pub unit: String,
    pub cost_halalas: i64,
    pub price_halalas: i64,
    pub supplier: Option<String>,
    #[ts(as = "Option<String>")]
    pub last_restocked: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Buckets the current stock level.
    pub fn stock_status(&self) -> StockStatus {
        if self.current_stock <= 0 {
            StockStatus::OutOfStock
        } else if self.current_stock <= self.min_stock {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
