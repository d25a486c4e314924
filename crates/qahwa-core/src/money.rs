//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many retail systems:                                                │
//! │    SR 10.00 / 3 = SR 3.33 (×3 = SR 9.99)  → Lost SR 0.01!              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Halalas                                          │
//! │    1000 halalas / 3 = 333 halalas (×3 = 999 halalas)                   │
//! │    We KNOW we lost 1 halala, and handle it explicitly                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use qahwa_core::money::Money;
//!
//! // Create from halalas (preferred)
//! let price = Money::from_halalas(1850); // SR 18.50
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // SR 37.00
//! let total = price + Money::from_halalas(500); // SR 23.50
//!
//! // NEVER do this:
//! // let bad = Money::from_float(18.50); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (halalas for SAR).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds, discounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price_halalas ──┬──► CartItem.unit_price ──► line totals      │
/// │                          │                                              │
/// │                          └──► Displayed as "SR 18.50" in UI             │
/// │                                                                         │
/// │  subtotal ──► reward discounts ──► order total ──► loyalty earnings    │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from halalas (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use qahwa_core::money::Money;
    ///
    /// let price = Money::from_halalas(1850); // Represents SR 18.50
    /// assert_eq!(price.halalas(), 1850);
    /// ```
    ///
    /// ## Why Halalas?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// Storage, calculations, and the API all use halalas.
    /// Only the UI converts to riyals for display.
    #[inline]
    pub const fn from_halalas(halalas: i64) -> Self {
        Money(halalas)
    }

    /// Creates a Money value from whole riyals.
    ///
    /// ## Example
    /// ```rust
    /// use qahwa_core::money::Money;
    ///
    /// let price = Money::from_riyals(15); // SR 15.00
    /// assert_eq!(price.halalas(), 1500);
    /// ```
    #[inline]
    pub const fn from_riyals(riyals: i64) -> Self {
        Money(riyals * 100)
    }

    /// Creates a Money value from major and minor units (riyals and halalas).
    ///
    /// ## Example
    /// ```rust
    /// use qahwa_core::money::Money;
    ///
    /// let price = Money::from_major_minor(18, 50); // SR 18.50
    /// assert_eq!(price.halalas(), 1850);
    ///
    /// let negative = Money::from_major_minor(-5, 50); // -SR 5.50 (refund)
    /// assert_eq!(negative.halalas(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -SR 5.50, not -SR 4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        // Handle sign: if major is negative, minor should subtract
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in halalas (smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use qahwa_core::money::Money;
    ///
    /// let price = Money::from_halalas(1850);
    /// assert_eq!(price.halalas(), 1850);
    /// ```
    #[inline]
    pub const fn halalas(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (riyals) portion.
    ///
    /// ## Example
    /// ```rust
    /// use qahwa_core::money::Money;
    ///
    /// let price = Money::from_halalas(1850);
    /// assert_eq!(price.riyals(), 18);
    ///
    /// let negative = Money::from_halalas(-550);
    /// assert_eq!(negative.riyals(), -5);
    /// ```
    #[inline]
    pub const fn riyals(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (halalas) portion (always 0-99).
    ///
    /// ## Example
    /// ```rust
    /// use qahwa_core::money::Money;
    ///
    /// let price = Money::from_halalas(1850);
    /// assert_eq!(price.halalas_part(), 50);
    ///
    /// let negative = Money::from_halalas(-550);
    /// assert_eq!(negative.halalas_part(), 50); // Absolute value
    /// ```
    #[inline]
    pub const fn halalas_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    ///
    /// ## Example
    /// ```rust
    /// use qahwa_core::money::Money;
    ///
    /// let zero = Money::zero();
    /// assert_eq!(zero.halalas(), 0);
    /// assert!(zero.is_zero());
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    ///
    /// ## Example
    /// ```rust
    /// use qahwa_core::money::Money;
    ///
    /// let refund = Money::from_halalas(-550);
    /// assert_eq!(refund.abs().halalas(), 550);
    /// ```
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// Products outside the `i64` range saturate at the bounds instead of
    /// wrapping.
    ///
    /// ## Example
    /// ```rust
    /// use qahwa_core::money::Money;
    ///
    /// let unit_price = Money::from_halalas(1500); // SR 15.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.halalas(), 3000); // SR 30.00
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Spanish Latte SR 15.00
    /// Quantity: 2
    ///      │
    ///      ▼
    /// multiply_quantity(2) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: SR 30.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        // Use i128 to prevent overflow on large amounts
        let wide = self.0 as i128 * qty as i128;
        if wide > i64::MAX as i128 {
            Money(i64::MAX)
        } else if wide < i64::MIN as i128 {
            Money(i64::MIN)
        } else {
            Money(wide as i64)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and receipts. Use frontend formatting for actual UI
/// display to handle localization (Arabic numerals) properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}SR {}.{:02}",
            sign,
            self.riyals().abs(),
            self.halalas_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        self.multiply_quantity(qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
