//! Scenario value objects: the inputs to one amortization projection.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MortgageError;
use crate::types::{Money, Percent};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Payment frequency
// ---------------------------------------------------------------------------

/// How often payments are made, and how the payment amount is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentFrequency {
    #[default]
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "biweekly")]
    BiWeekly,
    #[serde(rename = "accelerated_biweekly")]
    AcceleratedBiWeekly,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "accelerated_weekly")]
    AcceleratedWeekly,
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 5] = [
        PaymentFrequency::Monthly,
        PaymentFrequency::BiWeekly,
        PaymentFrequency::AcceleratedBiWeekly,
        PaymentFrequency::Weekly,
        PaymentFrequency::AcceleratedWeekly,
    ];

    pub fn payments_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::BiWeekly | PaymentFrequency::AcceleratedBiWeekly => 26,
            PaymentFrequency::Weekly | PaymentFrequency::AcceleratedWeekly => 52,
        }
    }

    pub fn is_accelerated(self) -> bool {
        self.accelerated_divisor().is_some()
    }

    /// Fraction of the monthly payment charged per period for accelerated
    /// schedules (half for biweekly, a quarter for weekly).
    pub fn accelerated_divisor(self) -> Option<u32> {
        match self {
            PaymentFrequency::AcceleratedBiWeekly => Some(2),
            PaymentFrequency::AcceleratedWeekly => Some(4),
            _ => None,
        }
    }

    /// Identifier used on the scenario form and in serialized input.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::BiWeekly => "biweekly",
            PaymentFrequency::AcceleratedBiWeekly => "accelerated_biweekly",
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::AcceleratedWeekly => "accelerated_weekly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "Monthly",
            PaymentFrequency::BiWeekly => "Bi-Weekly",
            PaymentFrequency::AcceleratedBiWeekly => "Accelerated Bi-Weekly",
            PaymentFrequency::Weekly => "Weekly",
            PaymentFrequency::AcceleratedWeekly => "Accelerated Weekly",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace(['-', ' '], "_");
        let freq = match normalised.as_str() {
            "monthly" => PaymentFrequency::Monthly,
            "biweekly" | "bi_weekly" => PaymentFrequency::BiWeekly,
            "accelerated_biweekly" | "accelerated_bi_weekly" => {
                PaymentFrequency::AcceleratedBiWeekly
            }
            "weekly" => PaymentFrequency::Weekly,
            "accelerated_weekly" => PaymentFrequency::AcceleratedWeekly,
            _ => {
                return Err(MortgageError::InvalidInput {
                    field: "payment_frequency".into(),
                    reason: format!(
                        "Unknown frequency '{s}'. Expected one of: monthly, biweekly, \
                         accelerated_biweekly, weekly, accelerated_weekly"
                    ),
                })
            }
        };
        Ok(freq)
    }
}

// ---------------------------------------------------------------------------
// Down payment
// ---------------------------------------------------------------------------

/// Which representation the down payment is entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownPaymentKind {
    Amount,
    Percent,
}

/// Down payment, either a fixed amount or a percentage of the purchase price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DownPayment {
    Amount(Money),
    Percent(Percent),
}

impl DownPayment {
    pub fn kind(&self) -> DownPaymentKind {
        match self {
            DownPayment::Amount(_) => DownPaymentKind::Amount,
            DownPayment::Percent(_) => DownPaymentKind::Percent,
        }
    }

    /// Dollar amount of the down payment for the given purchase price.
    pub fn amount(&self, purchase_price: Money) -> Money {
        match self {
            DownPayment::Amount(amount) => *amount,
            DownPayment::Percent(pct) => purchase_price * *pct / dec!(100),
        }
    }

    /// Re-express in `kind` while keeping the same dollar value.
    ///
    /// A zero purchase price converts an amount to 0%.
    pub fn converted_to(&self, kind: DownPaymentKind, purchase_price: Money) -> DownPayment {
        match (self, kind) {
            (DownPayment::Amount(_), DownPaymentKind::Amount)
            | (DownPayment::Percent(_), DownPaymentKind::Percent) => *self,
            (DownPayment::Percent(_), DownPaymentKind::Amount) => {
                DownPayment::Amount(self.amount(purchase_price))
            }
            (DownPayment::Amount(amount), DownPaymentKind::Percent) => {
                if purchase_price.is_zero() {
                    DownPayment::Percent(Decimal::ZERO)
                } else {
                    DownPayment::Percent(*amount / purchase_price * dec!(100))
                }
            }
        }
    }

    /// Clamp into `[0, purchase_price]` for amounts or `[0, 100]` for percents.
    pub fn clamped(&self, purchase_price: Money) -> DownPayment {
        match self {
            DownPayment::Amount(amount) => {
                let upper = purchase_price.max(Decimal::ZERO);
                DownPayment::Amount((*amount).clamp(Decimal::ZERO, upper))
            }
            DownPayment::Percent(pct) => {
                DownPayment::Percent((*pct).clamp(Decimal::ZERO, dec!(100)))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// A fully specified mortgage scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub purchase_price: Money,
    pub down_payment: DownPayment,
    /// Annual nominal rate, e.g. 5.5 for 5.5%.
    pub interest_rate: Percent,
    /// Years over which the loan is scheduled to be repaid.
    pub amortization_period: u32,
    /// Years until the term-end snapshot is taken.
    pub term: u32,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
    /// Added to every regular payment.
    #[serde(default)]
    pub extra_payment: Money,
    /// Percentage uplift applied to the regular payment.
    #[serde(default)]
    pub payment_increase: Percent,
    /// Lump sum paid at the end of each year, as a percentage of the original principal.
    #[serde(default)]
    pub annual_prepayment: Percent,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            purchase_price: dec!(500000),
            down_payment: DownPayment::Percent(dec!(20)),
            interest_rate: dec!(5.5),
            amortization_period: 25,
            term: 5,
            payment_frequency: PaymentFrequency::Monthly,
            extra_payment: Decimal::ZERO,
            payment_increase: Decimal::ZERO,
            annual_prepayment: Decimal::ZERO,
        }
    }
}

impl Scenario {
    pub fn down_payment_amount(&self) -> Money {
        self.down_payment.amount(self.purchase_price)
    }

    /// Amount financed: purchase price less down payment.
    pub fn principal(&self) -> Money {
        self.purchase_price - self.down_payment_amount()
    }

    /// Term used for the term-end snapshot, never beyond the amortization period.
    pub fn effective_term(&self) -> u32 {
        self.term.min(self.amortization_period)
    }

    /// Reject scenarios the amortization engine cannot meaningfully project.
    pub fn validate(&self) -> CalcResult<()> {
        if self.purchase_price < Decimal::ZERO {
            return Err(MortgageError::scenario(
                "purchase_price",
                "Purchase price cannot be negative",
            ));
        }
        match self.down_payment {
            DownPayment::Amount(amount) => {
                if amount < Decimal::ZERO || amount > self.purchase_price {
                    return Err(MortgageError::scenario(
                        "down_payment",
                        format!(
                            "Down payment {amount} must be between 0 and the purchase price {}",
                            self.purchase_price
                        ),
                    ));
                }
            }
            DownPayment::Percent(pct) => {
                if pct < Decimal::ZERO || pct > dec!(100) {
                    return Err(MortgageError::scenario(
                        "down_payment",
                        format!("Down payment {pct}% must be between 0% and 100%"),
                    ));
                }
            }
        }
        if self.principal() < Decimal::ZERO {
            return Err(MortgageError::scenario(
                "down_payment",
                "Principal cannot be negative",
            ));
        }
        if self.interest_rate < Decimal::ZERO {
            return Err(MortgageError::scenario(
                "interest_rate",
                "Interest rate cannot be negative",
            ));
        }
        if self.amortization_period == 0 {
            return Err(MortgageError::scenario(
                "amortization_period",
                "Amortization period must be at least 1 year",
            ));
        }
        if self.term == 0 {
            return Err(MortgageError::scenario(
                "term",
                "Term must be at least 1 year",
            ));
        }
        if self.extra_payment < Decimal::ZERO {
            return Err(MortgageError::scenario(
                "extra_payment",
                "Extra payment cannot be negative",
            ));
        }
        if self.payment_increase < Decimal::ZERO {
            return Err(MortgageError::scenario(
                "payment_increase",
                "Payment increase cannot be negative",
            ));
        }
        if self.annual_prepayment < Decimal::ZERO || self.annual_prepayment > dec!(100) {
            return Err(MortgageError::scenario(
                "annual_prepayment",
                "Annual prepayment must be between 0% and 100% of the original principal",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_payments_per_year() {
        let counts: Vec<u32> = PaymentFrequency::ALL
            .iter()
            .map(|f| f.payments_per_year())
            .collect();
        assert_eq!(counts, vec![12, 26, 26, 52, 52]);
    }

    #[test]
    fn test_accelerated_divisor() {
        assert_eq!(PaymentFrequency::AcceleratedBiWeekly.accelerated_divisor(), Some(2));
        assert_eq!(PaymentFrequency::AcceleratedWeekly.accelerated_divisor(), Some(4));
        assert!(!PaymentFrequency::BiWeekly.is_accelerated());
    }

    #[test]
    fn test_frequency_parse_round_trip() {
        for freq in PaymentFrequency::ALL {
            assert_eq!(freq.as_str().parse::<PaymentFrequency>().unwrap(), freq);
        }
        assert_eq!(
            "Accelerated Bi-Weekly".parse::<PaymentFrequency>().unwrap(),
            PaymentFrequency::AcceleratedBiWeekly
        );
        assert!("fortnightly".parse::<PaymentFrequency>().is_err());
    }

    #[test]
    fn test_frequency_serde_names() {
        let json = serde_json::to_string(&PaymentFrequency::AcceleratedWeekly).unwrap();
        assert_eq!(json, "\"accelerated_weekly\"");
    }

    #[test]
    fn test_down_payment_amount() {
        assert_eq!(DownPayment::Percent(dec!(20)).amount(dec!(500000)), dec!(100000));
        assert_eq!(DownPayment::Amount(dec!(75000)).amount(dec!(500000)), dec!(75000));
    }

    #[test]
    fn test_down_payment_toggle_preserves_value() {
        let pct = DownPayment::Amount(dec!(50000)).converted_to(DownPaymentKind::Percent, dec!(400000));
        assert_eq!(pct, DownPayment::Percent(dec!(12.5)));
        let back = pct.converted_to(DownPaymentKind::Amount, dec!(400000));
        assert_eq!(back, DownPayment::Amount(dec!(50000)));
    }

    #[test]
    fn test_down_payment_clamped() {
        assert_eq!(
            DownPayment::Amount(dec!(600000)).clamped(dec!(500000)),
            DownPayment::Amount(dec!(500000))
        );
        assert_eq!(
            DownPayment::Percent(dec!(-5)).clamped(dec!(500000)),
            DownPayment::Percent(Decimal::ZERO)
        );
    }

    #[test]
    fn test_default_principal() {
        let s = Scenario::default();
        assert_eq!(s.principal(), dec!(400000));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_down_payment_above_price_rejected() {
        let s = Scenario {
            down_payment: DownPayment::Amount(dec!(600000)),
            ..Scenario::default()
        };
        let err = s.validate().unwrap_err();
        assert!(matches!(err, MortgageError::InvalidScenario { ref field, .. } if field == "down_payment"));
    }

    #[test]
    fn test_zero_amortization_rejected() {
        let s = Scenario {
            amortization_period: 0,
            ..Scenario::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_effective_term_clamped() {
        let s = Scenario {
            term: 40,
            ..Scenario::default()
        };
        assert_eq!(s.effective_term(), 25);
    }

    #[test]
    fn test_scenario_deserialize_with_defaults() {
        let json = r#"{
            "purchase_price": 500000,
            "down_payment": { "type": "amount", "value": "100000" },
            "interest_rate": "5.5",
            "amortization_period": 25,
            "term": 5
        }"#;
        let s: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(s.payment_frequency, PaymentFrequency::Monthly);
        assert_eq!(s.extra_payment, Decimal::ZERO);
        assert_eq!(s.principal(), dec!(400000));
    }
}
