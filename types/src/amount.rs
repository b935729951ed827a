//! Scaled token amounts.
//!
//! Amounts are fixed-point integers (u128) paired with the asset's decimal count.
//! Converting a human decimal string is exact or it fails; nothing is rounded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// An integer ledger-unit value together with the decimals used to display it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenAmount {
    raw: u128,
    decimals: u8,
}

impl TokenAmount {
    /// Largest decimal count whose scale factor fits in a u128.
    pub const MAX_DECIMALS: u8 = 38;

    /// Wrap an integer ledger value. The decimal count is only used for display.
    pub fn from_raw(raw: u128, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Convert a human decimal string into ledger units.
    ///
    /// Fractional digits beyond `decimals` are accepted only when they are zeros.
    pub fn parse(text: &str, decimals: u8) -> Result<Self, TypesError> {
        if decimals > Self::MAX_DECIMALS {
            return Err(TypesError::UnsupportedDecimals(decimals));
        }
        let text = text.trim();
        if text.starts_with('-') {
            return Err(TypesError::InvalidAmount(format!("{text}: amount must not be negative")));
        }

        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, f),
            None => (text, ""),
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty()
            || !all_digits(int_part)
            || !all_digits(frac_part)
            || (text.contains('.') && frac_part.is_empty())
        {
            return Err(TypesError::InvalidAmount(text.to_string()));
        }

        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.len() > decimals as usize {
            return Err(TypesError::PrecisionLoss {
                amount: text.to_string(),
                decimals,
            });
        }

        let overflow = || TypesError::Overflow(text.to_string());
        let scale = 10u128.pow(decimals as u32);
        let int_value: u128 = int_part.parse().map_err(|_| overflow())?;
        let mut raw = int_value.checked_mul(scale).ok_or_else(overflow)?;
        if !frac_part.is_empty() {
            let frac_value: u128 = frac_part.parse().map_err(|_| overflow())?;
            let frac_scale = 10u128.pow((decimals as usize - frac_part.len()) as u32);
            raw = raw
                .checked_add(frac_value * frac_scale)
                .ok_or_else(overflow)?;
        }
        Ok(Self { raw, decimals })
    }

    pub fn raw(&self) -> u128 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }
}

impl fmt::Display for TokenAmount {
    /// Always prints exactly `decimals` fractional digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.decimals == 0 {
            return write!(f, "{}", self.raw);
        }
        let digits = self.raw.to_string();
        let decimals = self.decimals as usize;
        let padded = if digits.len() <= decimals {
            format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        write!(f, "{int_part}.{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_precision() {
        let amount = TokenAmount::parse("1.23456789", 8).unwrap();
        assert_eq!(amount.raw(), 123_456_789);
    }

    #[test]
    fn parse_whole_number() {
        assert_eq!(TokenAmount::parse("42", 2).unwrap().raw(), 4200);
        assert_eq!(TokenAmount::parse("42", 0).unwrap().raw(), 42);
    }

    #[test]
    fn fractional_with_zero_decimals_rejected() {
        let err = TokenAmount::parse("1.5", 0).unwrap_err();
        assert!(matches!(err, TypesError::PrecisionLoss { decimals: 0, .. }));
    }

    #[test]
    fn excess_precision_rejected() {
        assert!(TokenAmount::parse("0.123", 2).is_err());
    }

    #[test]
    fn trailing_zeros_beyond_precision_accepted() {
        assert_eq!(TokenAmount::parse("1.50", 1).unwrap().raw(), 15);
        assert_eq!(TokenAmount::parse("3.000", 0).unwrap().raw(), 3);
    }

    #[test]
    fn malformed_input_rejected() {
        for bad in ["", ".", ".5", "5.", "1.2.3", "abc", "-1", "1e5", "1,5"] {
            assert!(TokenAmount::parse(bad, 8).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn overflow_detected() {
        let huge = "9".repeat(40);
        assert!(matches!(
            TokenAmount::parse(&huge, 8),
            Err(TypesError::Overflow(_))
        ));
    }

    #[test]
    fn unsupported_decimals_rejected() {
        assert!(matches!(
            TokenAmount::parse("1", 39),
            Err(TypesError::UnsupportedDecimals(39))
        ));
    }

    #[test]
    fn display_pads_fraction() {
        assert_eq!(TokenAmount::from_raw(500, 2).to_string(), "5.00");
        assert_eq!(TokenAmount::from_raw(5, 3).to_string(), "0.005");
        assert_eq!(TokenAmount::from_raw(0, 8).to_string(), "0.00000000");
        assert_eq!(TokenAmount::from_raw(123_456_789, 8).to_string(), "1.23456789");
        assert_eq!(TokenAmount::from_raw(7, 0).to_string(), "7");
    }
}
