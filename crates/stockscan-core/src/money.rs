//! # Money Module
//!
//! Provides the `Money` type for handling prices safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Upstream sends:  "price": "9.99"                                       │
//! │  Parsed as f64:   9.9900000000000002131628...  ❌                        │
//! │  Parsed as text:  "N/A" → 0.0 (NSString.doubleValue)  ❌ SILENT ZERO    │
//! │                                                                         │
//! │  OUR SOLUTION: parse the decimal text straight into integer cents      │
//! │    "9.99"  → 999 cents                                                 │
//! │    "N/A"   → PriceError::NotNumeric  (record rejected)                 │
//! │    "-5.00" → PriceError::Negative    (record rejected)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockscan_core::money::Money;
//!
//! let price = Money::parse_decimal("10.99").unwrap();
//! assert_eq!(price.cents(), 1099);
//! assert_eq!(price.to_decimal_string(), "10.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::PriceError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Values produced by [`Money::parse_decimal`] are never negative and never
/// exceed [`Money::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Largest parseable price: $999,999,999,999.99.
    ///
    /// Every amount up to this has at most 14 significant digits, so it
    /// survives the JSON number wire format exactly.
    pub const MAX: Money = Money(99_999_999_999_999);

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use stockscan_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Parses a non-negative decimal string into cents.
    ///
    /// ## Accepted Format
    /// ```text
    /// [whitespace] digits [ "." digits ] [whitespace]
    ///
    ///   "9.99"    → 999        "  12 " → 1200
    ///   "0.5"     → 50         "1.005" → 101   (half up past the cent)
    ///
    ///   "N/A" "$9.99" "1e3" "NaN" "inf" ".5" "5." "+1"  → NotNumeric
    ///   "-5.00"                                         → Negative
    ///   "1000000000000"                                 → OutOfRange
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use stockscan_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("9.99").unwrap().cents(), 999);
    /// assert!(Money::parse_decimal("N/A").is_err());
    /// assert!(Money::parse_decimal("-5.00").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Money, PriceError> {
        let text = input.trim();

        if text.is_empty() {
            return Err(PriceError::Empty);
        }

        if text.starts_with('-') {
            return Err(PriceError::Negative(text.to_string()));
        }

        let (whole, fraction) = match text.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text, None),
        };

        let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(whole) || fraction.is_some_and(|f| !is_digits(f)) {
            return Err(PriceError::NotNumeric(text.to_string()));
        }

        let out_of_range = || PriceError::OutOfRange(text.to_string());

        let mut cents: i64 = 0;
        for b in whole.bytes() {
            cents = cents
                .checked_mul(10)
                .and_then(|c| c.checked_add((b - b'0') as i64))
                .ok_or_else(out_of_range)?;
        }
        cents = cents.checked_mul(100).ok_or_else(out_of_range)?;

        if let Some(fraction) = fraction {
            let digits = fraction.as_bytes();
            let tens = digits.first().map_or(0, |b| (b - b'0') as i64);
            let ones = digits.get(1).map_or(0, |b| (b - b'0') as i64);
            let round_up = digits.get(2).is_some_and(|b| *b >= b'5');
            cents = cents
                .checked_add(tens * 10 + ones + round_up as i64)
                .ok_or_else(out_of_range)?;
        }

        if cents > Money::MAX.0 {
            return Err(out_of_range());
        }

        Ok(Money(cents))
    }

    /// Formats as a plain decimal with exactly two fractional digits.
    ///
    /// ## Example
    /// ```rust
    /// use stockscan_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(999).to_decimal_string(), "9.99");
    /// assert_eq!(Money::from_cents(500).to_decimal_string(), "5.00");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs. Front-ends format prices themselves to handle
/// localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Decimal Wire Format
// =============================================================================

/// Serde adapter that writes [`Money`] as a JSON number with two decimals
/// (`9.99`) instead of integer cents.
///
/// Amounts beyond [`Money::MAX`] in either direction fail to serialize
/// rather than lose cents.
///
/// Use with `#[serde(with = "stockscan_core::money::decimal")]`.
pub mod decimal {
    use serde::de::{self, Deserializer, Visitor};
    use serde::ser;
    use serde::Serializer;
    use std::fmt;

    use super::Money;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        if money.cents().unsigned_abs() > Money::MAX.cents().unsigned_abs() {
            return Err(ser::Error::custom(format!(
                "price {} exceeds {}",
                money.to_decimal_string(),
                Money::MAX.to_decimal_string()
            )));
        }
        serializer.serialize_f64(money.cents() as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Money;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative decimal number or numeric string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
            self.visit_str(&v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
            self.visit_str(&v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
            self.visit_str(&v.to_string())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
            Money::parse_decimal(v).map_err(E::custom)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
