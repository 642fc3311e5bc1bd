//! # Barcode Module
//!
//! Validated product barcodes.
//!
//! ## GS1 Check Digit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EAN-13: 0 1 2 3 4 5 6 7 8 9 0 1 [2]                                    │
//! │          │ │ │ │ │ │ │ │ │ │ │ │  └── check digit                       │
//! │  weight  1 3 1 3 1 3 1 3 1 3 1 3                                        │
//! │                                                                         │
//! │  sum = 0+3+2+9+4+15+6+21+8+27+0+3 = 98                                  │
//! │  check = (10 - 98 % 10) % 10 = 2  ✅                                     │
//! │                                                                         │
//! │  Weights are assigned from the RIGHTMOST data digit (3, 1, 3, 1, ...)  │
//! │  so the same rule covers EAN-8, UPC-A and EAN-13.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A [`Barcode`] can only be obtained through [`Barcode::parse`], so holding
//! one means the format and checksum were already verified. The lookup
//! service takes `&Barcode`, which keeps malformed input from ever reaching
//! the provider.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Symbology
// =============================================================================

/// Barcode symbologies the lookup accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    /// 13 digits, the scanner default.
    Ean13,
    /// 8 digits, small packages.
    Ean8,
    /// 12 digits, North American retail.
    UpcA,
}

impl Symbology {
    /// Every supported symbology.
    pub const ALL: [Symbology; 3] = [Symbology::Ean13, Symbology::Ean8, Symbology::UpcA];

    /// Number of digits including the check digit.
    #[inline]
    pub const fn length(&self) -> usize {
        match self {
            Symbology::Ean13 => 13,
            Symbology::Ean8 => 8,
            Symbology::UpcA => 12,
        }
    }

    fn for_length(len: usize, allowed: &[Symbology]) -> Option<Symbology> {
        allowed.iter().copied().find(|s| s.length() == len)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbology::Ean13 => write!(f, "ean13"),
            Symbology::Ean8 => write!(f, "ean8"),
            Symbology::UpcA => write!(f, "upc_a"),
        }
    }
}

impl std::str::FromStr for Symbology {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ean13" | "ean_13" => Ok(Symbology::Ean13),
            "ean8" | "ean_8" => Ok(Symbology::Ean8),
            "upc_a" | "upca" | "upc" => Ok(Symbology::UpcA),
            other => Err(ValidationError::InvalidFormat {
                field: "symbology".to_string(),
                reason: format!(
                    "unknown symbology '{}'. Valid options: ean13, ean8, upc_a",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Barcode
// =============================================================================

/// A barcode whose length and check digit have been verified.
///
/// Serializes as the bare digit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Barcode {
    code: String,
    symbology: Symbology,
}

impl Barcode {
    /// Validates raw scanner output against the allowed symbologies.
    ///
    /// ## Rules
    /// - Surrounding whitespace is trimmed
    /// - Only ASCII digits
    /// - Length must match one of `allowed`
    /// - Last digit must be the GS1 check digit of the others
    ///
    /// ## Example
    /// ```rust
    /// use stockscan_core::barcode::{Barcode, Symbology};
    ///
    /// assert!(Barcode::parse("4006381333931", &[Symbology::Ean13]).is_ok());
    /// assert!(Barcode::parse("4006381333932", &[Symbology::Ean13]).is_err());
    /// assert!(Barcode::parse("bad", &[Symbology::Ean13]).is_err());
    /// ```
    pub fn parse(input: &str, allowed: &[Symbology]) -> Result<Self, ValidationError> {
        let code = input.trim();

        if code.is_empty() {
            return Err(ValidationError::Required {
                field: "barcode".to_string(),
            });
        }

        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidFormat {
                field: "barcode".to_string(),
                reason: "must contain only digits".to_string(),
            });
        }

        let symbology = Symbology::for_length(code.len(), allowed).ok_or_else(|| {
            let lengths: Vec<String> = allowed.iter().map(|s| s.length().to_string()).collect();
            ValidationError::InvalidFormat {
                field: "barcode".to_string(),
                reason: format!(
                    "expected {} digits, got {}",
                    lengths.join(" or "),
                    code.len()
                ),
            }
        })?;

        let digits: Vec<u8> = code.bytes().map(|b| b - b'0').collect();
        let (data, check) = digits.split_at(digits.len() - 1);
        let expected = check_digit(data);
        if check[0] != expected {
            return Err(ValidationError::ChecksumMismatch {
                expected,
                actual: check[0],
            });
        }

        Ok(Barcode {
            code: code.to_string(),
            symbology,
        })
    }

    /// The digit string, check digit included.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Which symbology matched.
    #[inline]
    pub fn symbology(&self) -> Symbology {
        self.symbology
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl Serialize for Barcode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}

/// Computes the GS1 mod-10 check digit for the data digits.
///
/// ## Example
/// ```rust
/// use stockscan_core::barcode::check_digit;
///
/// assert_eq!(check_digit(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1]), 2);
/// ```
pub fn check_digit(data: &[u8]) -> u8 {
    let sum: u32 = data
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let weight = if i % 2 == 0 { 3 } else { 1 };
            d as u32 * weight
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

// =============================================================================
// Unit Tests
// =============================================================================
