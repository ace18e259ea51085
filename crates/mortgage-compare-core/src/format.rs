//! Currency and quantity formatting for presentation, plus lenient parsing
//! of currency strings typed into a form.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::error::MortgageError;
use crate::types::{Money, Percent, Years};
use crate::CalcResult;

/// Round to whole cents, half away from zero.
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round fractional years to two decimals.
pub fn round_years(value: Years) -> Years {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format as dollars with thousands separators, e.g. `$1,234.57` or `-$80.00`.
pub fn format_currency(value: Money) -> String {
    let mut rounded = round_money(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded = rounded.abs();
    rounded.rescale(2);

    let text = rounded.to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}.{cents}")
    } else {
        format!("${grouped}.{cents}")
    }
}

/// Format a form percentage, e.g. `5.5%`.
pub fn format_percent(value: Percent) -> String {
    format!("{}%", value.round_dp(2).normalize())
}

/// Format fractional years to one decimal, e.g. `21.3 years`.
pub fn format_years(value: Years) -> String {
    let rounded = value
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded == dec!(1) {
        "1 year".to_string()
    } else {
        format!("{rounded} years")
    }
}

/// Parse a currency string as typed on a form: `$`, commas and spaces are ignored.
pub fn parse_currency(input: &str) -> CalcResult<Money> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' ' | '\u{a0}'))
        .collect();

    if cleaned.is_empty() {
        return Err(MortgageError::InvalidInput {
            field: "amount".into(),
            reason: "Amount is empty".into(),
        });
    }

    Decimal::from_str(&cleaned).map_err(|e| MortgageError::InvalidInput {
        field: "amount".into(),
        reason: format!("'{input}' is not a valid amount: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(dec!(2456.349969)), "$2,456.35");
        assert_eq!(format_currency(dec!(400000)), "$400,000.00");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(999.995)), "$1,000.00");
        assert_eq!(format_currency(dec!(12)), "$12.00");
    }

    #[test]
    fn test_format_currency_negative_and_zero() {
        assert_eq!(format_currency(dec!(-80)), "-$80.00");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_format_percent_and_years() {
        assert_eq!(format_percent(dec!(5.50)), "5.5%");
        assert_eq!(format_years(dec!(21.2692307)), "21.3 years");
        assert_eq!(format_years(dec!(25)), "25 years");
        assert_eq!(format_years(dec!(1.0)), "1 year");
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$1,234.50").unwrap(), dec!(1234.50));
        assert_eq!(parse_currency(" 500 000 ").unwrap(), dec!(500000));
        assert!(parse_currency("").is_err());
        assert!(parse_currency("$abc").is_err());
    }
}
