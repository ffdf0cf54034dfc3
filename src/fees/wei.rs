//! Decimal ether conversions for the caller boundary
//!
//! The ledger itself only ever sees integer wei. Surrounding layers deal
//! in decimal ether strings typed by users; these helpers convert exactly,
//! with no floating point anywhere.

use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, ToPrimitive};
use std::str::FromStr;

use crate::types::{LedgerError, LedgerResult, Wei};

/// Number of wei in one ether.
pub const WEI_PER_ETHER: Wei = 1_000_000_000_000_000_000;

/// Parse a decimal ether string into wei.
///
/// Accepts any non-negative decimal with at most 18 fractional digits of
/// precision; everything else fails with [`LedgerError::InvalidAmount`].
///
/// ```
/// use feedback_core::fees::wei::parse_ether;
///
/// assert_eq!(parse_ether("1.5").unwrap(), 1_500_000_000_000_000_000);
/// assert_eq!(parse_ether("0").unwrap(), 0);
/// assert!(parse_ether("-1").is_err());
/// ```
pub fn parse_ether(amount: &str) -> LedgerResult<Wei> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidAmount("amount is empty".to_string()));
    }

    let ether = BigDecimal::from_str(trimmed).map_err(|_| {
        LedgerError::InvalidAmount(format!("not a decimal number: {trimmed:?}"))
    })?;

    if ether.sign() == Sign::Minus {
        return Err(LedgerError::InvalidAmount(
            "amount cannot be negative".to_string(),
        ));
    }

    let wei = ether * BigDecimal::from(BigInt::from(WEI_PER_ETHER));
    if !wei.is_integer() {
        return Err(LedgerError::InvalidAmount(format!(
            "{trimmed} has more precision than one wei"
        )));
    }

    wei.to_u128().ok_or_else(|| {
        LedgerError::InvalidAmount(format!("{trimmed} exceeds the representable wei range"))
    })
}

/// Format a wei amount as a decimal ether string with trailing zeros removed.
pub fn format_ether(amount: Wei) -> String {
    BigDecimal::new(BigInt::from(amount), 18)
        .normalized()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_ether() {
        assert_eq!(parse_ether("1").unwrap(), WEI_PER_ETHER);
        assert_eq!(parse_ether("1.5").unwrap(), 1_500_000_000_000_000_000);
        assert_eq!(parse_ether("0.000000000000000001").unwrap(), 1);
        assert_eq!(parse_ether(" 2 ").unwrap(), 2 * WEI_PER_ETHER);
        assert_eq!(parse_ether("0").unwrap(), 0);
    }

    #[test]
    fn rejects_malformed_and_negative_amounts() {
        for bad in ["", "  ", "abc", "1.2.3", "-1", "-0.5"] {
            assert!(
                matches!(parse_ether(bad), Err(LedgerError::InvalidAmount(_))),
                "expected InvalidAmount for {bad:?}"
            );
        }
    }

    #[test]
    fn rejects_sub_wei_precision() {
        assert!(matches!(
            parse_ether("0.0000000000000000001"),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn formats_without_trailing_zeros() {
        assert_eq!(format_ether(WEI_PER_ETHER), "1");
        assert_eq!(format_ether(1_500_000_000_000_000_000), "1.5");
        assert_eq!(format_ether(995), "0.000000000000000995");
        assert_eq!(format_ether(0), "0");
    }

    #[test]
    fn parse_and_format_round_trip() {
        for wei in [1u128, 995, WEI_PER_ETHER, 12_345_678_900_000_000_000] {
            assert_eq!(parse_ether(&format_ether(wei)).unwrap(), wei);
        }
    }
}
