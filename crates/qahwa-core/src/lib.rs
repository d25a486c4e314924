//! # qahwa-core: Pure Business Logic for Qahwa
//!
//! This crate is the **heart** of Qahwa. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Qahwa Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Client Apps (Arabic / English UI)                  │   │
//! │  │    Menu UI ──► Cart UI ──► Rewards UI ──► Order Tracking       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ API layer (out of scope)               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                qahwa-store (Entity Store)                       │   │
//! │  │    repositories, reward ledger, order placement, config        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ qahwa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  routing  │  │   │
//! │  │   │  Product  │  │   Money   │  │ summarize │  │ haversine │  │   │
//! │  │   │   Order   │  │  halalas  │  │  summary  │  │  select   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SHARED STATE • NO NETWORK • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, Branch, Reward, etc.)
//! - [`text`] - Bilingual Arabic/English text values
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`cart`] - Pure cart aggregation
//! - [`loyalty`] - Loyalty point math (earning, eligibility, expiry)
//! - [`routing`] - Branch selection and preparation estimates
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Shared state, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in halalas (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use qahwa_core::money::Money;
//!
//! // Create money from halalas (never from floats!)
//! let price = Money::from_halalas(1850); // SR 18.50
//!
//! assert_eq!(price.riyals(), 18);
//! assert_eq!(price.halalas_part(), 50);
//! assert_eq!(price.to_string(), "SR 18.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod loyalty;
pub mod money;
pub mod routing;
pub mod text;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use qahwa_core::Money` instead of
// `use qahwa_core::money::Money`

pub use cart::{summarize, CartSummary};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use text::{BilingualText, Lang};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum items allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable order sizes.
/// Can be made configurable per-branch in future versions.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10)
/// Configurable per-branch in future versions.
pub const MAX_ITEM_QUANTITY: i64 = 99;

/// Rolling loyalty-point expiry window in days
///
/// Every point credit pushes the user's expiry horizon this many days
/// forward. The store's configuration can override the window at runtime.
pub const POINTS_EXPIRY_DAYS: i64 = 30;

/// Base preparation minutes before any items are counted
pub const BASE_PREP_MINUTES: i64 = 5;

/// Additional preparation minutes per item quantity
pub const PREP_MINUTES_PER_ITEM: i64 = 3;
