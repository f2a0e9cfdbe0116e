//! Rupee amounts using decimal arithmetic.
//!
//! All cart and order arithmetic goes through [`Money`] so that totals are
//! computed on exact decimals and rounded once, on the cent boundary.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Tax applied to every order subtotal (5%).
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Currency symbol for Indian Rupees.
pub const RUPEE: &str = "\u{20b9}";

/// An amount in Indian Rupees.
///
/// Amounts are never negative in this domain, so round-half-up and
/// round-half-away-from-zero coincide.
///
/// ```
/// use bihar_bhojan_core::Money;
/// use rust_decimal::Decimal;
///
/// let subtotal = Money::new(Decimal::new(38000, 2));
/// assert_eq!(subtotal.tax().to_string(), "₹19.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Build an amount from whole paise (e.g. `15050` is ₹150.50).
    #[must_use]
    pub fn from_paise(paise: i64) -> Self {
        Self(Decimal::new(paise, 2))
    }

    /// The underlying decimal.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Round to two decimal places, half-up on the cent boundary.
    ///
    /// The result always carries exactly two decimal places, so whole
    /// amounts serialize as `"360.00"`.
    #[must_use]
    pub fn round_cents(self) -> Self {
        let mut amount = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(2);
        Self(amount)
    }

    /// Tax owed on this amount, already rounded to cents.
    #[must_use]
    pub fn tax(self) -> Self {
        Self(self.0 * TAX_RATE).round_cents()
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Render without the symbol and without trailing zeros (`300`, `12.5`).
    #[must_use]
    pub fn plain(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{RUPEE}{:.2}", self.round_cents().0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        self.times(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}
