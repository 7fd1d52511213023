//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A till that drifts by a paisa per line item loses real money          │
//! │  over a season of track bookings and café orders.                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹500.00 is stored as 50000. All arithmetic stays in i64.            │
//! │    Rounding happens exactly once, at the tax step, and is explicit.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use trackside_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(50000); // ₹500.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // ₹1000.00
//! let total = price + Money::from_paise(2500);  // ₹525.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(500.0); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for daybook expense entries
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support; serializes as a bare integer
///
/// Every monetary value in the system flows through this type: catalog
/// prices, line snapshots, sale header totals, expense amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use trackside_core::money::Money;
    ///
    /// let price = Money::from_paise(50000); // Represents ₹500.00
    /// assert_eq!(price.paise(), 50000);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use trackside_core::money::Money;
    ///
    /// let price = Money::from_rupees(500, 50); // ₹500.50
    /// assert_eq!(price.paise(), 50050);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the rupee part should be negative.
    /// `from_rupees(-5, 50)` = -₹5.50, not -₹4.50
    #[inline]
    pub const fn from_rupees(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
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
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the negated value. Used by the daybook, where expenses
    /// appear as negative ledger entries.
    #[inline]
    pub const fn negate(&self) -> Self {
        Money(-self.0)
    }

    /// Calculates tax on this amount, rounding half up.
    ///
    /// ## Implementation
    /// Integer math only: `(amount × bps + 5000) / 10000`.
    /// The +5000 rounds the half-paisa boundary up. i128 intermediate
    /// prevents overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use trackside_core::money::Money;
    /// use trackside_core::types::TaxRate;
    ///
    /// let pre_tax = Money::from_paise(20000);   // ₹200.00
    /// let rate = TaxRate::from_bps(1000);       // 10%
    ///
    /// let tax = pre_tax.calculate_tax(rate);
    /// assert_eq!(tax.paise(), 2000);            // ₹20.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_paise = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(tax_paise as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use trackside_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(15000); // ₹150.00
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.paise(), 45000);     // ₹450.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. The front end formats for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
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
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Sum over an iterator of Money values (line totals → header totals).
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(50050);
        assert_eq!(money.paise(), 50050);
        assert_eq!(money.rupees(), 500);
        assert_eq!(money.paise_part(), 50);
    }

    #[test]
    fn test_from_rupees() {
        let money = Money::from_rupees(500, 50);
        assert_eq!(money.paise(), 50050);

        let negative = Money::from_rupees(-5, 50);
        assert_eq!(negative.paise(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(50050)), "₹500.50");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        let result: Money = a * 3;
        assert_eq!(result.paise(), 3000);
    }

    #[test]
    fn test_tax_calculation_basic() {
        // ₹200.00 at 10% = ₹20.00
        let amount = Money::from_paise(20000);
        let rate = TaxRate::from_bps(1000);
        let tax = amount.calculate_tax(rate);
        assert_eq!(tax.paise(), 2000);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // ₹10.00 at 8.25% = 82.5 paise → rounds up to 83
        let amount = Money::from_paise(1000);
        let rate = TaxRate::from_bps(825);
        let tax = amount.calculate_tax(rate);
        assert_eq!(tax.paise(), 83);
    }

    #[test]
    fn test_tax_on_zero_rate() {
        let amount = Money::from_paise(45000);
        let tax = amount.calculate_tax(TaxRate::from_bps(0));
        assert!(tax.is_zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_paise(100);
        assert!(!positive.is_zero());
        assert!(positive.is_positive());
        assert!(!positive.is_negative());

        let negative = Money::from_paise(-100);
        assert!(!negative.is_zero());
        assert!(!negative.is_positive());
        assert!(negative.is_negative());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_paise(15000);
        let line_total = unit_price.multiply_quantity(3);
        assert_eq!(line_total.paise(), 45000);
    }

    #[test]
    fn test_negate() {
        let expense = Money::from_paise(120000);
        assert_eq!(expense.negate().paise(), -120000);
        assert_eq!(expense.negate().negate(), expense);
    }

    #[test]
    fn test_sum() {
        let lines = vec![
            Money::from_paise(45000),
            Money::from_paise(20000),
            Money::from_paise(5000),
        ];
        let total: Money = lines.into_iter().sum();
        assert_eq!(total.paise(), 70000);
    }

    /// ₹10.00 split three ways and reassembled loses exactly one paisa.
    /// Documents the intentional precision behavior of integer division.
    #[test]
    fn test_division_precision_loss_documented() {
        let ten = Money::from_paise(1000);
        let one_third = Money::from_paise(1000 / 3); // 333
        let reconstructed: Money = one_third * 3; // 999

        assert_eq!(reconstructed.paise(), 999);
        let lost = ten - reconstructed;
        assert_eq!(lost.paise(), 1);
    }
}
