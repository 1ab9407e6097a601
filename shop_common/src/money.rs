use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// The store's ISO currency code, in the lowercase form the payment provider expects.
pub const STORE_CURRENCY_CODE: &str = "cad";

//--------------------------------------       Money        ---------------------------------------------------------
/// A currency amount, stored as an integer number of minor units (cents).
///
/// Payment providers expect integer minor-unit amounts, so keeping the internal representation in cents means the
/// value handed to the provider is exactly the value stored against the order, with no rounding at the boundary.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    /// Saturates at the i64 bounds rather than wrapping. Callers validate quantities before multiplying; the
    /// saturation only guards against absurd amounts corrupting totals silently.
    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value().saturating_mul(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a currency amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for Money {
    type Error = MoneyConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(MoneyConversionError(format!("Value {} is too large to convert to Money", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl Money {
    /// The amount as an integer number of minor units. This is the value the payment provider receives.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_minor_units(cents: i64) -> Self {
        Self(cents)
    }

    pub fn from_whole_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Converts a decimal currency string (e.g. "10.00") into minor units, rounding to the nearest cent.
    pub fn from_decimal_str(s: &str) -> Result<Self, MoneyConversionError> {
        let value = s.trim().parse::<f64>().map_err(|e| MoneyConversionError(format!("{s} is not a number: {e}")))?;
        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
            return Err(MoneyConversionError(format!("{s} is out of range")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(cents as i64))
    }
}
