//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors that can occur while pricing a cart or an order.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount cannot be represented in the currency's minor units (amount, currency).
    #[error("amount {0} is out of range for {1}")]
    OutOfRange(Decimal, &'static str),

    /// Multiplying or summing prices overflowed.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// Surcharge applied on top of the cart subtotal when an order is placed.
pub fn surcharge_rate() -> Percentage {
    Percentage::from(Decimal::new(1, 1))
}

/// Price of a single cart line.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in a decimal.
pub fn line_total(unit_price: Decimal, quantity: u32) -> Result<Decimal, PricingError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Sum of line totals.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the sum does not fit in a decimal.
pub fn sum_totals<I>(totals: I) -> Result<Decimal, PricingError>
where
    I: IntoIterator<Item = Result<Decimal, PricingError>>,
{
    totals.into_iter().try_fold(Decimal::ZERO, |sum, total| {
        sum.checked_add(total?).ok_or(PricingError::Overflow)
    })
}

/// Converts a decimal amount into money, rounding to the currency's minor units.
///
/// # Errors
///
/// Returns [`PricingError::OutOfRange`] if the rounded amount does not fit in minor units.
pub fn money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let exponent = currency.exponent;

    let minor_units = amount
        .round_dp_with_strategy(exponent, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::from(10_u64.pow(exponent)))
        .and_then(|value| value.to_i64())
        .ok_or(PricingError::OutOfRange(amount, currency.iso_alpha_code))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Decimal amount held by a money value.
pub fn amount(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}

/// Total charged for an order with the given subtotal (subtotal plus surcharge).
///
/// Both the displayed total and the persisted order total come from here.
///
/// # Errors
///
/// Returns [`PricingError::OutOfRange`] if the total does not fit in minor units.
pub fn order_total(
    subtotal: Money<'static, Currency>,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let subtotal = amount(&subtotal);

    money(subtotal + surcharge_rate() * subtotal, currency)
}

/// Surcharge portion of an order total.
///
/// # Errors
///
/// Returns [`PricingError::OutOfRange`] if either amount does not fit in minor units.
pub fn surcharge(
    subtotal: Money<'static, Currency>,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let total = order_total(subtotal, currency)?;

    money(amount(&total) - amount(&subtotal), currency)
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_total_multiplies_by_quantity() -> TestResult {
        assert_eq!(line_total(dec!(4.99), 2)?, dec!(9.98));
        assert_eq!(line_total(dec!(4.99), 0)?, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn line_total_reports_overflow() {
        assert_eq!(line_total(Decimal::MAX, 2), Err(PricingError::Overflow));
    }

    #[test]
    fn sum_totals_reports_overflow() {
        let half = Decimal::MAX / Decimal::TWO;

        assert_eq!(
            sum_totals([Ok(half), Ok(half), Ok(half)]),
            Err(PricingError::Overflow)
        );
    }

    #[test]
    fn money_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(money(dec!(10.978), iso::INR)?, Money::from_minor(10_98, iso::INR));
        assert_eq!(money(dec!(0.005), iso::INR)?, Money::from_minor(1, iso::INR));

        Ok(())
    }

    #[test]
    fn money_respects_zero_exponent_currencies() -> TestResult {
        assert_eq!(money(dec!(149.5), iso::JPY)?, Money::from_minor(150, iso::JPY));

        Ok(())
    }

    #[test]
    fn money_rejects_amounts_out_of_range() {
        let result = money(Decimal::MAX, iso::INR);

        assert!(matches!(result, Err(PricingError::OutOfRange(_, "INR"))));
    }

    #[test]
    fn order_total_adds_ten_percent() -> TestResult {
        let subtotal = Money::from_minor(100_00, iso::INR);

        assert_eq!(
            order_total(subtotal, iso::INR)?,
            Money::from_minor(110_00, iso::INR)
        );

        Ok(())
    }

    #[test]
    fn order_total_rounds_to_minor_units() -> TestResult {
        let subtotal = Money::from_minor(9_98, iso::INR);

        assert_eq!(
            order_total(subtotal, iso::INR)?,
            Money::from_minor(10_98, iso::INR)
        );

        Ok(())
    }

    #[test]
    fn surcharge_is_total_minus_subtotal() -> TestResult {
        let subtotal = Money::from_minor(250_00, iso::INR);

        assert_eq!(
            surcharge(subtotal, iso::INR)?,
            Money::from_minor(25_00, iso::INR)
        );

        Ok(())
    }

    #[test]
    fn amount_reads_minor_units_back() {
        assert_eq!(amount(&Money::from_minor(10_98, iso::INR)), dec!(10.98));
    }
}
