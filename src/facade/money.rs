//! Conversion between decimal amounts and integer minor units

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{LedgerError, MinorUnits};

/// Minor units per major unit (cents per currency unit)
pub const MINOR_PER_MAJOR: i64 = 100;

/// Convert a decimal amount to minor units
///
/// Computes `round(amount * 100)`, rounding half away from zero.
/// Non-positive amounts, amounts that round to zero and amounts beyond the
/// u64 range are rejected with `InvalidArgument`.
pub fn to_minor_units(amount: Decimal) -> Result<MinorUnits, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidArgument {
            reason: format!("amount must be greater than zero, got {}", amount),
        });
    }

    let scaled = amount
        .checked_mul(Decimal::from(MINOR_PER_MAJOR))
        .ok_or_else(|| LedgerError::invalid_argument("amount is too large"))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    match scaled.to_u64() {
        Some(0) => Err(LedgerError::InvalidArgument {
            reason: format!("amount {} is smaller than one minor unit", amount),
        }),
        Some(units) => Ok(units),
        None => Err(LedgerError::invalid_argument("amount is too large")),
    }
}

/// Convert a starting balance to minor units
///
/// Same as [`to_minor_units`] except that zero is a valid balance.
pub fn balance_to_minor_units(balance: Decimal) -> Result<MinorUnits, LedgerError> {
    if balance.is_zero() {
        return Ok(0);
    }
    to_minor_units(balance)
}

/// Convert minor units back to a decimal amount with two decimal places
pub fn from_minor_units(units: MinorUnits) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(units), 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case::whole("3", 300)]
    #[case::cents("12.34", 1234)]
    #[case::rounds_half_up("0.005", 1)]
    #[case::rounds_down("1.004", 100)]
    #[case::rounds_up("1.006", 101)]
    #[case::float_artifact("0.29", 29)]
    fn test_to_minor_units(#[case] amount: &str, #[case] expected: MinorUnits) {
        let amount = Decimal::from_str(amount).unwrap();
        assert_eq!(to_minor_units(amount), Ok(expected));
    }

    #[rstest]
    #[case::zero("0")]
    #[case::negative("-5.00")]
    #[case::below_one_cent("0.004")]
    #[case::too_large("1000000000000000000000")]
    fn test_to_minor_units_rejects(#[case] amount: &str) {
        let amount = Decimal::from_str(amount).unwrap();
        assert!(matches!(
            to_minor_units(amount),
            Err(LedgerError::InvalidArgument { .. })
        ));
    }

    #[rstest]
    #[case::zero("0", Ok(0))]
    #[case::positive("10.50", Ok(1050))]
    fn test_balance_to_minor_units(
        #[case] balance: &str,
        #[case] expected: Result<MinorUnits, LedgerError>,
    ) {
        let balance = Decimal::from_str(balance).unwrap();
        assert_eq!(balance_to_minor_units(balance), expected);
    }

    #[test]
    fn test_balance_to_minor_units_rejects_negative() {
        assert!(balance_to_minor_units(Decimal::new(-1, 0)).is_err());
    }

    #[rstest]
    #[case(0, "0.00")]
    #[case(70000, "700.00")]
    #[case(1234, "12.34")]
    #[case(u64::MAX, "184467440737095516.15")]
    fn test_from_minor_units(#[case] units: MinorUnits, #[case] expected: &str) {
        assert_eq!(from_minor_units(units).to_string(), expected);
    }
}
