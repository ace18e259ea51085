use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::CalcResult;

/// Compound growth factor (1 + r)^n
pub fn annuity_growth(rate: Rate, nper: u32) -> CalcResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| MortgageError::Overflow {
            context: format!("growth factor (1 + {rate})^{nper}"),
        })
}

/// Level payment that retires `principal` over `nper` periods at `rate` per period.
///
/// Returned as a positive amount. A zero rate falls back to straight-line
/// repayment, `principal / nper`.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> CalcResult<Money> {
    if nper == 0 {
        return Err(MortgageError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = annuity_growth(rate, nper)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "annuity payment denominator".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| MortgageError::Overflow {
            context: format!("annuity payment on {principal} at {rate} over {nper} periods"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_annuity_payment_monthly() {
        // 400k over 25 years at 5.5% compounded monthly
        let pmt = annuity_payment(dec!(400000), dec!(0.055) / dec!(12), 300).unwrap();
        assert!((pmt - dec!(2456.35)).abs() < dec!(0.01), "got {pmt}");
    }

    #[test]
    fn test_annuity_payment_zero_rate() {
        let pmt = annuity_payment(dec!(120000), Decimal::ZERO, 120).unwrap();
        assert_eq!(pmt, dec!(1000));
    }

    #[test]
    fn test_annuity_payment_zero_periods() {
        assert!(annuity_payment(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_growth_factor() {
        assert_eq!(annuity_growth(dec!(0.10), 2).unwrap(), dec!(1.21));
        assert_eq!(annuity_growth(dec!(0.05), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_annuity_payment_overflow_is_an_error() {
        // (1 + 10)^24 fits, but principal * rate * factor does not
        let result = annuity_payment(dec!(400000), dec!(10), 24);
        assert!(
            matches!(result, Err(MortgageError::Overflow { .. })),
            "got {result:?}"
        );
    }
}
