//! Monetary amounts backed by decimal arithmetic.

use core::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Money`] value.
#[derive(thiserror::Error, Debug, Clone)]
pub enum MoneyError {
    /// The amount is negative.
    #[error("amount cannot be negative")]
    Negative,
    /// The input could not be parsed as a decimal.
    #[error("invalid amount: {0}")]
    Invalid(String),
}

/// An amount of money in Indian rupees.
///
/// Amounts are non-negative decimals. Serialization uses the decimal string
/// form (`"2999.00"`); deserialization accepts both strings and JSON numbers.
///
/// ## Examples
///
/// ```
/// use trikart_core::Money;
///
/// let price = Money::from_rupees(100);
/// let subtotal = price.times(2);
/// assert_eq!(subtotal, Money::from_rupees(200));
///
/// // 18% tax on 200, rounded half-up to whole rupees
/// let tax = subtotal.percent_rounded(rust_decimal::Decimal::from(18));
/// assert_eq!(tax, Money::from_rupees(36));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a `Money` from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Negative` if the amount is negative.
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative);
        }
        Ok(Self(amount))
    }

    /// Create a `Money` from a whole number of rupees.
    #[must_use]
    pub fn from_rupees(rupees: u32) -> Self {
        Self(Decimal::from(rupees))
    }

    /// Parse a `Money` from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Invalid` if the input is not a decimal, or
    /// `MoneyError::Negative` if it is negative.
    pub fn parse(s: &str) -> Result<Self, MoneyError> {
        let amount = s
            .trim()
            .parse::<Decimal>()
            .map_err(|e| MoneyError::Invalid(e.to_string()))?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Take a percentage of this amount, rounded half-up to whole rupees.
    #[must_use]
    pub fn percent_rounded(&self, percent: Decimal) -> Self {
        let raw = self.0 * percent / Decimal::ONE_HUNDRED;
        Self(raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Absolute difference between two amounts.
    #[must_use]
    pub fn abs_diff(&self, other: Self) -> Self {
        Self((self.0 - other.0).abs())
    }

    /// Whether the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with sqlite feature)
//
// SQLite has no decimal column type, so amounts are stored as TEXT and
// parsed on the way out.
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Money {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Money {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
        let amount = s.parse::<Decimal>()?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.0.to_string(), buf)
    }
}
