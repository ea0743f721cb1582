use crate::error::CoreError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary amount held as an integer number of cents.
///
/// This is the only place where cents and dollars are converted. Storage and
/// transport always use cents; dollars appear only at the form boundary
/// (`from_dollars`) and the display boundary (`to_dollars`, `format`).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct Money(i64);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Converts a dollar amount to cents, rounding half away from zero to the nearest cent.
    pub fn from_dollars(dollars: Decimal) -> Result<Self, CoreError> {
        dollars
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Self)
            .ok_or_else(|| CoreError::AmountOutOfRange(dollars.to_string()))
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// The amount in dollars, always with two decimal places.
    pub fn to_dollars(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Formats as US currency, e.g. `$1,234.56` or `-$5.00`.
    pub fn format(self) -> String {
        let magnitude = self.0.unsigned_abs();
        let whole = group_thousands(magnitude / 100);
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{sign}${whole}.{:02}", magnitude % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
