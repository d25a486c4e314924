//! # Loyalty Point Math
//!
//! Pure helpers behind the reward ledger: redeem eligibility, earning, and
//! the rolling expiry window. The store tier owns the balances; this module
//! only answers questions about them.
//!
//! ## The Rolling Window
//! Points do not expire on a fixed calendar date. Every credit (earning,
//! bonus points, a refund from un-applying a reward) pushes the user's
//! expiry horizon to `now + window`. A customer who keeps ordering never
//! loses points; thirty quiet days and the balance lapses.

use chrono::{DateTime, Duration, Utc};

use crate::money::Money;
use crate::types::{Reward, User};

// =============================================================================
// Eligibility
// =============================================================================

/// Checks whether a reward's per-user usage cap is exhausted.
///
/// `times_redeemed` counts *consumed* redemptions (rewards that went out
/// with a placed order), not rewards currently sitting applied on a cart.
#[inline]
pub fn usage_exhausted(reward: &Reward, times_redeemed: u32) -> bool {
    match reward.max_usage_per_user {
        Some(max) => times_redeemed >= max,
        None => false,
    }
}

/// Checks whether a user can redeem a reward right now.
///
/// ## Rules
/// - The reward must be active
/// - The user's balance must cover `points_required`
/// - The per-user usage cap must not be exhausted
///
/// Cart-dependent checks (minimum order amount, already-applied) live in
/// the ledger, which can see the cart.
pub fn can_redeem(user: &User, reward: &Reward, times_redeemed: u32) -> bool {
    reward.is_active
        && user.loyalty_points >= reward.points_required
        && !usage_exhausted(reward, times_redeemed)
}

// =============================================================================
// Earning
// =============================================================================

/// Points earned for a charged order total.
///
/// Whole riyals only; the halala remainder earns nothing.
///
/// ## Example
/// ```rust
/// use qahwa_core::loyalty::points_earned;
/// use qahwa_core::money::Money;
///
/// // SR 45.50 at 1 point per riyal → 45 points
/// assert_eq!(points_earned(Money::from_halalas(4550), 1), 45);
///
/// // Double-points promotion
/// assert_eq!(points_earned(Money::from_halalas(4550), 2), 90);
/// ```
#[inline]
pub fn points_earned(total: Money, points_per_riyal: i64) -> i64 {
    total.riyals() * points_per_riyal
}

// =============================================================================
// Expiry
// =============================================================================

/// The expiry horizon a credit at `now` establishes.
#[inline]
pub fn next_expiry(now: DateTime<Utc>, window_days: i64) -> DateTime<Utc> {
    now + Duration::days(window_days)
}

/// Checks whether a user's balance has lapsed.
///
/// A user with no expiry horizon (never credited) or a zero balance has
/// nothing to lapse.
pub fn has_lapsed(user: &User, now: DateTime<Utc>) -> bool {
    if user.loyalty_points <= 0 {
        return false;
    }
    match user.points_expire_at {
        Some(expire_at) => expire_at < now,
        None => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
