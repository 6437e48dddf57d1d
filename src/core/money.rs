//! Monetary helpers shared by every component.
//!
//! Amounts are `Decimal` throughout. [`round_cents`] is the only place an
//! amount is rounded, so balances and transfers always agree to the cent.

use crate::core::error::SplitError;
use rust_decimal::{Decimal, RoundingStrategy};

/// One cent. Balances and remainders smaller than this count as settled.
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Round to two decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use split_engine::core::money::round_cents;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_cents(dec!(2.675)), dec!(2.68));
/// assert_eq!(round_cents(dec!(-2.675)), dec!(-2.68));
/// ```
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether an amount is within one cent of zero.
///
/// Exactly one cent still counts as settled: the optimizer only moves
/// amounts strictly larger than [`EPSILON`].
pub fn is_settled(amount: Decimal) -> bool {
    amount.abs() <= EPSILON
}

/// Add up amounts, failing instead of overflowing.
pub fn checked_sum<I>(amounts: I, context: &str) -> Result<Decimal, SplitError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(|| SplitError::AmountOverflow {
            context: context.to_string(),
        })
}

/// Reject zero and negative amounts.
pub fn ensure_positive(amount: Decimal, context: impl Into<String>) -> Result<Decimal, SplitError> {
    if amount <= Decimal::ZERO {
        return Err(SplitError::InvalidAmount {
            context: context.into(),
            amount,
        });
    }
    Ok(amount)
}

/// Parse user-supplied amount text.
///
/// Non-numeric text fails with [`SplitError::UnparseableAmount`]; it is never
/// coerced to zero.
pub fn parse_amount(input: &str) -> Result<Decimal, SplitError> {
    input
        .trim()
        .parse::<Decimal>()
        .map_err(|_| SplitError::UnparseableAmount {
            input: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_epsilon_is_one_cent() {
        assert_eq!(EPSILON, dec!(0.01));
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_cents(dec!(0.005)), dec!(0.01));
        assert_eq!(round_cents(dec!(-0.005)), dec!(-0.01));
        assert_eq!(round_cents(dec!(21.665)), dec!(21.67));
        assert_eq!(round_cents(dec!(33.333333)), dec!(33.33));
    }

    #[test]
    fn test_is_settled() {
        assert!(is_settled(dec!(0.005)));
        assert!(is_settled(dec!(-0.0099)));
        assert!(is_settled(dec!(0.01)));
        assert!(is_settled(dec!(-0.01)));
        assert!(!is_settled(dec!(0.011)));
        assert!(!is_settled(dec!(-12)));
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum(vec![dec!(1.50), dec!(2.25)], "t").unwrap(), dec!(3.75));
        assert_eq!(checked_sum(Vec::new(), "t").unwrap(), Decimal::ZERO);
        assert_eq!(
            checked_sum(vec![Decimal::MAX, dec!(1)], "totals"),
            Err(SplitError::AmountOverflow {
                context: "totals".to_string()
            })
        );
    }

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive(dec!(10), "x").unwrap(), dec!(10));
        assert!(matches!(
            ensure_positive(Decimal::ZERO, "expense"),
            Err(SplitError::InvalidAmount { .. })
        ));
        assert!(ensure_positive(dec!(-1), "expense").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 85.50 ").unwrap(), dec!(85.50));
        assert_eq!(
            parse_amount("NaN"),
            Err(SplitError::UnparseableAmount {
                input: "NaN".to_string()
            })
        );
        assert!(parse_amount("").is_err());
        assert!(parse_amount("12abc").is_err());
    }
}
