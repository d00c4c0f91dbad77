//! Money in minor currency units.
//!
//! All prices in Menulane are stored and computed in kobo (the minor unit of
//! the Nigerian naira), matching what the payment gateway expects. Conversion
//! to a decimal amount only happens at the display edge.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of money in minor currency units (kobo).
///
/// Arithmetic stays in integer space; [`Money::display`] renders the major
/// unit with two decimal places.
///
/// ```
/// use menulane_core::Money;
///
/// let price = Money::from_minor(350_000);
/// assert_eq!(price.display(), "\u{20a6}3,500.00");
/// assert_eq!((price + Money::from_minor(50_000)).as_minor(), 400_000);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Create from minor currency units (kobo).
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// The amount in minor currency units.
    #[must_use]
    pub const fn as_minor(&self) -> i64 {
        self.0
    }

    /// The amount as a decimal in the major unit (naira).
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Format for display with the naira sign and thousands separators.
    #[must_use]
    pub fn display(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / 100;
        let minor = abs % 100;

        // Insert thousands separators into the major part
        let digits = major.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i).is_multiple_of(3) {
                grouped.push(',');
            }
            grouped.push(c);
        }

        format!("{sign}\u{20a6}{grouped}.{minor:02}")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_small_amount() {
        assert_eq!(Money::from_minor(50).display(), "\u{20a6}0.50");
    }

    #[test]
    fn test_display_thousands_grouping() {
        assert_eq!(Money::from_minor(123_456_789).display(), "\u{20a6}1,234,567.89");
        assert_eq!(Money::from_minor(100_000).display(), "\u{20a6}1,000.00");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Money::from_minor(-150).display(), "-\u{20a6}1.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1_000);
        let b = Money::from_minor(250);
        assert_eq!((a + b).as_minor(), 1_250);
        assert_eq!((b * 4).as_minor(), 1_000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.as_minor(), 1_500);
    }

    #[test]
    fn test_as_decimal() {
        assert_eq!(Money::from_minor(12_345).as_decimal(), Decimal::new(12_345, 2));
    }
}
