//! Amount type for handling monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Amounts are stored as decimal
//! text so they round-trip exactly, and are shown to people with a currency symbol, thousands
//! separators and two decimal places.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;
use tracing::warn;

/// The message given when an amount is larger than `Amount::LIMIT`.
pub(crate) const AMOUNT_TOO_LARGE: &str = "Amounts cannot be larger than 1,000,000,000,000,000";

/// Represents a monetary amount.
///
/// Equality and ordering are numeric, so `50` and `50.00` are equal, but the textual form is kept
/// as it was parsed.
///
/// # Examples
///
/// Parsing and writing back out:
/// ```
/// # use spendbook::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1,050.5").unwrap();
/// assert_eq!(amount.to_string(), "1050.5");
/// ```
///
/// Formatting for display:
/// ```
/// # use spendbook::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1050.5").unwrap();
/// assert_eq!(amount.format("$"), "$1,050.50");
/// ```
///
/// Numeric equality
/// ```
/// # use spendbook::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("50").unwrap();
/// let b = Amount::from_str("50.00").unwrap();
/// assert_eq!(a, b);
/// assert_ne!(a.to_string(), b.to_string());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// The largest magnitude accepted on input and in storage, 10^15. Sums of many such amounts
    /// still fit in a `Decimal`.
    pub const LIMIT: Amount = Amount(Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0));

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the amount is less than zero.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Returns true if the magnitude is no larger than `Amount::LIMIT`.
    pub fn is_within_limit(&self) -> bool {
        self.0.abs() <= Self::LIMIT.0
    }

    /// Adds without overflowing. A sum too large for a `Decimal` saturates and is logged.
    pub fn saturating_add(self, rhs: Self) -> Self {
        match self.0.checked_add(rhs.0) {
            Some(value) => Amount(value),
            None => {
                warn!("The sum of {self} and {rhs} is too large and was capped");
                Amount(if rhs.0.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                })
            }
        }
    }

    /// Formats the amount for people, e.g. `-₹60,000.00`.
    pub fn format(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs().round_dp(2);
        format!(
            "{sign}{symbol}{}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError {
    input: String,
    source: Option<rust_decimal::Error>,
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmountError")
            .field("input", &self.input)
            .field("source", &self.source)
            .finish()
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a number", self.input)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError {
                input: s.to_string(),
                source: None,
            });
        }

        // Digit separators other than commas are not numbers to a person
        if trimmed.contains('_') {
            return Err(AmountError {
                input: s.to_string(),
                source: None,
            });
        }

        // Remove commas (thousand separators)
        let without_commas = trimmed.replace(',', "");

        // Number inputs may hand us exponent notation, e.g. 1e3
        let parsed = Decimal::from_str(&without_commas)
            .or_else(|_| Decimal::from_scientific(&without_commas));
        match parsed {
            Ok(value) => Ok(Amount(value)),
            Err(e) => Err(AmountError {
                input: s.to_string(),
                source: Some(e),
            }),
        }
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Stored amounts are usually decimal text, but older files may hold bare JSON numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = match RawAmount::deserialize(deserializer)? {
            RawAmount::Text(s) => s,
            RawAmount::Number(n) => n.to_string(),
        };
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        self.saturating_add(Amount(-rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
