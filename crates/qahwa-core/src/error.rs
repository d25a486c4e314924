//! # Error Types
//!
//! Domain-specific error types for Qahwa.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  qahwa-core errors (this file)                                         │
//! │  ├── CoreError        - Domain failures (shared by qahwa-store too;    │
//! │  │                      the store tier has no I/O of its own, so it    │
//! │  │                      introduces no second error type)               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  API errors (transport layer, out of scope)                            │
//! │  └── map CoreError variants to response codes                          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → API layer → Client                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (entity, id, amounts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;
use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An entity cannot be found by id.
    ///
    /// ## When This Occurs
    /// - The id does not exist in the store
    /// - The entity was deleted
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// User does not have enough loyalty points for a reward.
    ///
    /// ## User Workflow
    /// ```text
    /// Apply reward (costs 100 points)
    ///      │
    ///      ▼
    /// Check balance: 50 points
    ///      │
    ///      ▼
    /// InsufficientPoints { required: 100, available: 50 }
    ///      │
    ///      ▼
    /// UI shows: "You need 50 more points"
    /// ```
    #[error("Insufficient points: required {required}, available {available}")]
    InsufficientPoints { required: i64, available: i64 },

    /// The reward is already applied to this user's cart.
    /// A reward can be applied at most once per cart.
    #[error("Reward {reward_id} is already applied to this cart")]
    RewardAlreadyApplied { reward_id: String },

    /// The reward is not currently applied, so it cannot be removed.
    #[error("Reward {reward_id} is not applied to this cart")]
    RewardNotApplied { reward_id: String },

    /// The reward exists but is deactivated.
    #[error("Reward {reward_id} is not active")]
    RewardNotActive { reward_id: String },

    /// The user has exhausted this reward's per-user redemption cap.
    #[error("Reward {reward_id} already redeemed the maximum {max_usage} times")]
    RewardLimitReached { reward_id: String, max_usage: u32 },

    /// The cart subtotal is below the reward's minimum order amount.
    #[error("Minimum order of {required} not met (cart subtotal is {subtotal})")]
    MinOrderNotMet { required: Money, subtotal: Money },

    /// A stock decrement would drop the level below zero.
    #[error("Insufficient stock for {id}: available {available}, requested {requested}")]
    InsufficientStock {
        id: String,
        available: i64,
        requested: i64,
    },

    /// Product exists but is not orderable (inactive).
    #[error("Product {product_id} is not available for ordering")]
    ProductUnavailable { product_id: String },

    /// Order placement requires at least one cart line.
    #[error("Cart is empty for user {user_id}")]
    EmptyCart { user_id: String },

    /// No branch is currently accepting orders.
    ///
    /// ## When This Occurs
    /// - Every branch has `is_open = false`
    /// - The store has no branches at all
    #[error("No open branches available")]
    NoOpenBranches,

    /// The requested order status change is not a legal lifecycle step.
    ///
    /// ## When This Occurs
    /// - Skipping ahead (pending → ready)
    /// - Moving backwards (ready → preparing)
    /// - Touching a terminal order (delivered, cancelled)
    #[error("Order cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Configuration could not be read, parsed, or passed validation.
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error with entity context.
    ///
    /// ## Example
    /// ```rust
    /// use qahwa_core::error::CoreError;
    ///
    /// let err = CoreError::not_found("Product", "prod_123");
    /// assert_eq!(err.to_string(), "Product not found: prod_123");
    /// ```
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
