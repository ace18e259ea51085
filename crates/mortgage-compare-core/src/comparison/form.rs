//! Editable form state for the two scenarios and the explicit recompute step.
//!
//! Numeric fields can be empty while the user is typing. Nothing is computed
//! until both forms are complete; then the comparison is rebuilt from scratch.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::comparison::differences::{compare_scenarios, Comparison, ComparisonInput};
use crate::mortgage::scenario::{DownPayment, DownPaymentKind, PaymentFrequency, Scenario};
use crate::types::{ComputationOutput, Money, Percent};
use crate::CalcResult;

/// Amortization periods offered on the form, in years.
pub const AMORTIZATION_PERIODS: [u32; 6] = [5, 10, 15, 20, 25, 30];

/// Terms offered on the form, in years.
pub const TERMS: [u32; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// Raw form state for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioForm {
    pub purchase_price: Option<Money>,
    /// Interpreted according to `down_payment_kind`.
    pub down_payment: Option<Decimal>,
    pub down_payment_kind: DownPaymentKind,
    pub interest_rate: Option<Percent>,
    pub amortization_period: Option<u32>,
    pub term: Option<u32>,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
    pub extra_payment: Option<Money>,
    pub payment_increase: Option<Percent>,
    pub annual_prepayment: Option<Percent>,
}

impl Default for ScenarioForm {
    fn default() -> Self {
        ScenarioForm::from_scenario(&Scenario::default())
    }
}

impl ScenarioForm {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let (down_payment, down_payment_kind) = match scenario.down_payment {
            DownPayment::Amount(v) => (v, DownPaymentKind::Amount),
            DownPayment::Percent(v) => (v, DownPaymentKind::Percent),
        };
        Self {
            purchase_price: Some(scenario.purchase_price),
            down_payment: Some(down_payment),
            down_payment_kind,
            interest_rate: Some(scenario.interest_rate),
            amortization_period: Some(scenario.amortization_period),
            term: Some(scenario.term),
            payment_frequency: scenario.payment_frequency,
            extra_payment: Some(scenario.extra_payment),
            payment_increase: Some(scenario.payment_increase),
            annual_prepayment: Some(scenario.annual_prepayment),
        }
    }

    /// True when every numeric field holds a value.
    pub fn is_complete(&self) -> bool {
        self.purchase_price.is_some()
            && self.down_payment.is_some()
            && self.interest_rate.is_some()
            && self.amortization_period.is_some()
            && self.term.is_some()
            && self.extra_payment.is_some()
            && self.payment_increase.is_some()
            && self.annual_prepayment.is_some()
    }

    /// Switch the down payment between amount and percent, keeping its dollar value.
    ///
    /// Without a purchase price the value cannot be carried over and is cleared.
    pub fn set_down_payment_kind(&mut self, kind: DownPaymentKind) {
        if kind == self.down_payment_kind {
            return;
        }
        self.down_payment = match (self.down_payment, self.purchase_price) {
            (Some(value), Some(price)) => {
                let current = self.tagged_down_payment(value);
                Some(match current.converted_to(kind, price) {
                    DownPayment::Amount(v) | DownPayment::Percent(v) => v,
                })
            }
            _ => None,
        };
        self.down_payment_kind = kind;
    }

    /// Build a scenario from a complete form, clamping fields into their
    /// allowed ranges and snapping the period and term to the nearest offered
    /// choice. Returns `None` while any field is empty.
    pub fn to_scenario(&self) -> Option<Scenario> {
        let purchase_price = self.purchase_price?.max(Decimal::ZERO);
        let down_payment = self
            .tagged_down_payment(self.down_payment?)
            .clamped(purchase_price);

        Some(Scenario {
            purchase_price,
            down_payment,
            interest_rate: self.interest_rate?.max(Decimal::ZERO),
            amortization_period: nearest_choice(self.amortization_period?, &AMORTIZATION_PERIODS),
            term: nearest_choice(self.term?, &TERMS),
            payment_frequency: self.payment_frequency,
            extra_payment: self.extra_payment?.max(Decimal::ZERO),
            payment_increase: self.payment_increase?.max(Decimal::ZERO),
            annual_prepayment: self.annual_prepayment?.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
        })
    }

    fn tagged_down_payment(&self, value: Decimal) -> DownPayment {
        match self.down_payment_kind {
            DownPaymentKind::Amount => DownPayment::Amount(value),
            DownPaymentKind::Percent => DownPayment::Percent(value),
        }
    }
}

/// Closest entry of `choices`; ties go to the shorter choice.
fn nearest_choice(value: u32, choices: &[u32]) -> u32 {
    choices
        .iter()
        .copied()
        .min_by_key(|choice| (choice.abs_diff(value), *choice))
        .unwrap_or(value)
}

/// Recompute the comparison when both forms are complete.
///
/// Returns `Ok(None)` while either form still has an empty field.
pub fn recompute(
    form_a: &ScenarioForm,
    form_b: &ScenarioForm,
) -> CalcResult<Option<ComputationOutput<Comparison>>> {
    let (Some(scenario_a), Some(scenario_b)) = (form_a.to_scenario(), form_b.to_scenario()) else {
        debug!("scenario form incomplete; skipping recompute");
        return Ok(None);
    };

    compare_scenarios(&ComparisonInput {
        scenario_a,
        scenario_b,
    })
    .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_form_round_trips_scenario() {
        let form = ScenarioForm::default();
        assert!(form.is_complete());
        assert_eq!(form.to_scenario(), Some(Scenario::default()));
    }

    #[test]
    fn test_incomplete_form_yields_none() {
        let form = ScenarioForm {
            interest_rate: None,
            ..ScenarioForm::default()
        };
        assert!(!form.is_complete());
        assert_eq!(form.to_scenario(), None);
        assert!(recompute(&form, &ScenarioForm::default()).unwrap().is_none());
    }

    #[test]
    fn test_toggle_down_payment_kind() {
        let mut form = ScenarioForm::default();
        form.set_down_payment_kind(DownPaymentKind::Amount);
        assert_eq!(form.down_payment, Some(dec!(100000)));
        form.set_down_payment_kind(DownPaymentKind::Percent);
        assert_eq!(form.down_payment, Some(dec!(20)));
    }

    #[test]
    fn test_toggle_without_price_clears_value() {
        let mut form = ScenarioForm {
            purchase_price: None,
            ..ScenarioForm::default()
        };
        form.set_down_payment_kind(DownPaymentKind::Amount);
        assert_eq!(form.down_payment, None);
        assert_eq!(form.down_payment_kind, DownPaymentKind::Amount);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let form = ScenarioForm {
            down_payment: Some(dec!(150)),
            amortization_period: Some(45),
            term: Some(0),
            ..ScenarioForm::default()
        };
        let scenario = form.to_scenario().unwrap();
        assert_eq!(scenario.down_payment, DownPayment::Percent(dec!(100)));
        assert_eq!(scenario.amortization_period, 30);
        assert_eq!(scenario.term, 1);
    }

    #[test]
    fn test_period_snaps_to_offered_choice() {
        let form = ScenarioForm {
            amortization_period: Some(7),
            term: Some(4),
            ..ScenarioForm::default()
        };
        let scenario = form.to_scenario().unwrap();
        assert_eq!(scenario.amortization_period, 5);
        assert_eq!(scenario.term, 4);

        assert_eq!(nearest_choice(8, &AMORTIZATION_PERIODS), 10);
        assert_eq!(nearest_choice(28, &AMORTIZATION_PERIODS), 30);
        assert_eq!(nearest_choice(0, &AMORTIZATION_PERIODS), 5);
    }

    #[test]
    fn test_recompute_complete_forms() {
        let a = ScenarioForm::default();
        let b = ScenarioForm {
            extra_payment: Some(dec!(250)),
            ..ScenarioForm::default()
        };
        let output = recompute(&a, &b).unwrap().unwrap();
        assert!(output.result.differences.time_shaved > Decimal::ZERO);
        assert!(output.result.differences.total_interest_lifetime < Decimal::ZERO);
    }
}
