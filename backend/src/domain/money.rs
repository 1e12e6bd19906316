//! Fixed-point value types for currency and probabilities.
//!
//! Monetary amounts are carried as integer minor units (cents) and approval
//! probabilities as integer hundredths, so persistence and arithmetic stay
//! exact. Parsing accepts at most two decimal places.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors for fixed-point parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedPointParseError {
    Empty,
    Malformed,
    TooManyDecimals,
    Negative,
    OutOfRange,
}

impl fmt::Display for FixedPointParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "amount must not be empty"),
            Self::Malformed => write!(f, "amount must be a decimal number"),
            Self::TooManyDecimals => write!(f, "amount must have at most two decimal places"),
            Self::Negative => write!(f, "amount must not be negative"),
            Self::OutOfRange => write!(f, "amount is out of range"),
        }
    }
}

impl std::error::Error for FixedPointParseError {}

fn split_fixed_point(raw: &str) -> Result<(u64, u64), FixedPointParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FixedPointParseError::Empty);
    }
    if raw.starts_with('-') {
        return Err(FixedPointParseError::Negative);
    }
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (raw, ""),
    };
    if fraction.len() > 2 {
        return Err(FixedPointParseError::TooManyDecimals);
    }
    let whole: u64 = whole.parse().map_err(|_| FixedPointParseError::Malformed)?;
    let hundredths = match fraction.len() {
        0 => 0,
        _ => {
            let parsed: u64 = fraction
                .parse()
                .map_err(|_| FixedPointParseError::Malformed)?;
            if fraction.len() == 1 { parsed * 10 } else { parsed }
        }
    };
    Ok((whole, hundredths))
}

/// A non-negative currency amount in minor units (cents), two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Wrap an amount already expressed in cents.
    pub fn from_cents(cents: i64) -> Result<Self, FixedPointParseError> {
        if cents < 0 {
            return Err(FixedPointParseError::Negative);
        }
        Ok(Self(cents))
    }

    /// Parse a decimal string such as `"12500.75"`.
    pub fn parse(raw: &str) -> Result<Self, FixedPointParseError> {
        let (whole, hundredths) = split_fixed_point(raw)?;
        let cents = whole
            .checked_mul(100)
            .and_then(|value| value.checked_add(hundredths))
            .ok_or(FixedPointParseError::OutOfRange)?;
        let cents = i64::try_from(cents).map_err(|_| FixedPointParseError::OutOfRange)?;
        Ok(Self(cents))
    }

    /// The amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// A probability in `[0.00, 1.00]` held as integer hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Probability(i16);

impl Probability {
    /// Wrap a value already expressed in hundredths (0..=100).
    pub fn from_hundredths(hundredths: i16) -> Result<Self, FixedPointParseError> {
        if !(0..=100).contains(&hundredths) {
            return Err(FixedPointParseError::OutOfRange);
        }
        Ok(Self(hundredths))
    }

    /// Parse a decimal string such as `"0.85"`.
    pub fn parse(raw: &str) -> Result<Self, FixedPointParseError> {
        let (whole, hundredths) = split_fixed_point(raw)?;
        let total = whole
            .checked_mul(100)
            .and_then(|value| value.checked_add(hundredths))
            .ok_or(FixedPointParseError::OutOfRange)?;
        let total = i16::try_from(total).map_err(|_| FixedPointParseError::OutOfRange)?;
        Self::from_hundredths(total)
    }

    /// The value in hundredths.
    pub fn hundredths(&self) -> i16 {
        self.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
