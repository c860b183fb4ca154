//! Prices

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors raised while converting exact amounts into displayable money.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The amount does not fit in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    Overflow(Decimal),
}

/// Round an exact amount to the currency's minor units for display.
///
/// Totals are kept exact (a 10% tax on 49.99 is 4.999); rounding happens only
/// here, half away from zero.
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] if the amount does not fit in `i64` minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PriceError> {
    let minor = 10_i64
        .checked_pow(currency.exponent)
        .map(Decimal::from)
        .and_then(|factor| amount.checked_mul(factor))
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .ok_or(PriceError::Overflow(amount))?;

    Ok(Money::from_minor(minor, currency))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use rusty_money::iso::{GBP, JPY, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn rounds_sub_cent_totals() -> TestResult {
        assert_eq!(to_money(dec!(64.989), USD)?, Money::from_minor(64_99, USD));
        assert_eq!(to_money(dec!(4.999), USD)?, Money::from_minor(5_00, USD));

        Ok(())
    }

    #[test]
    fn rounds_half_away_from_zero() -> TestResult {
        assert_eq!(to_money(dec!(0.125), GBP)?, Money::from_minor(13, GBP));
        assert_eq!(to_money(dec!(-0.125), GBP)?, Money::from_minor(-13, GBP));

        Ok(())
    }

    #[test]
    fn respects_currency_exponent() -> TestResult {
        assert_eq!(to_money(dec!(1500.4), JPY)?, Money::from_minor(1500, JPY));

        Ok(())
    }

    #[test]
    fn overflow_is_reported() {
        let amount = Decimal::MAX;

        assert_eq!(to_money(amount, USD), Err(PriceError::Overflow(amount)));
    }
}
