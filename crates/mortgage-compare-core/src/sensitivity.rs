//! One-way sensitivity sweeps: vary a single scenario input over a range and
//! record how an output metric responds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;

use crate::error::MortgageError;
use crate::format::{round_money, round_years};
use crate::mortgage::amortization::{amortize, MortgageResult};
use crate::mortgage::scenario::Scenario;
use crate::types::{with_metadata, ComputationOutput};
use crate::CalcResult;

const MAX_SWEEP_POINTS: usize = 1000;

/// Scenario input that can be swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepVariable {
    InterestRate,
    ExtraPayment,
    PaymentIncrease,
    AnnualPrepayment,
    PurchasePrice,
}

impl SweepVariable {
    fn apply(self, scenario: &mut Scenario, value: Decimal) {
        match self {
            SweepVariable::InterestRate => scenario.interest_rate = value,
            SweepVariable::ExtraPayment => scenario.extra_payment = value,
            SweepVariable::PaymentIncrease => scenario.payment_increase = value,
            SweepVariable::AnnualPrepayment => scenario.annual_prepayment = value,
            SweepVariable::PurchasePrice => scenario.purchase_price = value,
        }
    }
}

impl FromStr for SweepVariable {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "interest_rate" => Ok(SweepVariable::InterestRate),
            "extra_payment" => Ok(SweepVariable::ExtraPayment),
            "payment_increase" => Ok(SweepVariable::PaymentIncrease),
            "annual_prepayment" => Ok(SweepVariable::AnnualPrepayment),
            "purchase_price" => Ok(SweepVariable::PurchasePrice),
            other => Err(MortgageError::InvalidInput {
                field: "variable".into(),
                reason: format!(
                    "Unknown variable '{other}'. Available: interest_rate, extra_payment, \
                     payment_increase, annual_prepayment, purchase_price"
                ),
            }),
        }
    }
}

/// Result field recorded at each sweep point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMetric {
    MonthlyPayment,
    TotalInterestLifetime,
    TotalInterestTerm,
    BalanceAtEndOfTerm,
    EffectiveAmortization,
}

impl OutputMetric {
    pub fn extract(self, result: &MortgageResult) -> Decimal {
        match self {
            OutputMetric::MonthlyPayment => result.monthly_payment,
            OutputMetric::TotalInterestLifetime => result.total_interest_lifetime,
            OutputMetric::TotalInterestTerm => result.total_interest_term,
            OutputMetric::BalanceAtEndOfTerm => result.balance_at_end_of_term,
            OutputMetric::EffectiveAmortization => result.effective_amortization,
        }
    }

    /// Round a metric value for display: years or cents.
    pub fn round(self, value: Decimal) -> Decimal {
        match self {
            OutputMetric::EffectiveAmortization => round_years(value),
            _ => round_money(value),
        }
    }
}

impl FromStr for OutputMetric {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "monthly_payment" => Ok(OutputMetric::MonthlyPayment),
            "total_interest_lifetime" => Ok(OutputMetric::TotalInterestLifetime),
            "total_interest_term" => Ok(OutputMetric::TotalInterestTerm),
            "balance_at_end_of_term" => Ok(OutputMetric::BalanceAtEndOfTerm),
            "effective_amortization" => Ok(OutputMetric::EffectiveAmortization),
            other => Err(MortgageError::InvalidInput {
                field: "metric".into(),
                reason: format!(
                    "Unknown metric '{other}'. Available: monthly_payment, \
                     total_interest_lifetime, total_interest_term, \
                     balance_at_end_of_term, effective_amortization"
                ),
            }),
        }
    }
}

/// Input for a one-way sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub base: Scenario,
    pub variable: SweepVariable,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
    pub metric: OutputMetric,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub value: Decimal,
    pub output: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable: SweepVariable,
    pub metric: OutputMetric,
    pub points: Vec<SensitivityPoint>,
    /// Metric for the unmodified base scenario.
    pub base_case_value: Decimal,
}

impl SensitivityOutput {
    /// Copy with every metric value rounded for display.
    pub fn rounded(&self) -> SensitivityOutput {
        SensitivityOutput {
            variable: self.variable,
            metric: self.metric,
            points: self
                .points
                .iter()
                .map(|p| SensitivityPoint {
                    value: p.value,
                    output: self.metric.round(p.output),
                })
                .collect(),
            base_case_value: self.metric.round(self.base_case_value),
        }
    }
}

/// Generate the sweep values from min to max with step, always including max.
fn generate_sweep_values(input: &SensitivityInput) -> CalcResult<Vec<Decimal>> {
    if input.step <= Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "step".into(),
            reason: "Step must be positive".into(),
        });
    }
    if input.min > input.max {
        return Err(MortgageError::InvalidInput {
            field: "min".into(),
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = input.min;
    while current <= input.max {
        values.push(current);
        if values.len() > MAX_SWEEP_POINTS {
            return Err(MortgageError::InvalidInput {
                field: "step".into(),
                reason: format!("Sweep would exceed {MAX_SWEEP_POINTS} points"),
            });
        }
        current += input.step;
    }
    if let Some(&last) = values.last() {
        if last < input.max {
            values.push(input.max);
        }
    }

    Ok(values)
}

/// Sweep one variable across its range, recording the chosen metric.
///
/// Points where the scenario becomes invalid are skipped with a warning.
pub fn run_sensitivity(input: &SensitivityInput) -> CalcResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let base_case_value = input.metric.extract(&amortize(&input.base)?);
    let values = generate_sweep_values(input)?;

    let mut points = Vec::with_capacity(values.len());
    for value in values {
        let mut scenario = input.base.clone();
        input.variable.apply(&mut scenario, value);
        match amortize(&scenario) {
            Ok(result) => points.push(SensitivityPoint {
                value,
                output: input.metric.extract(&result),
            }),
            Err(e) => warnings.push(format!("Skipped {value}: {e}")),
        }
    }

    let output = SensitivityOutput {
        variable: input.variable,
        metric: input.metric,
        points,
        base_case_value,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "One-Way Mortgage Sensitivity Sweep",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sweep(variable: SweepVariable, min: Decimal, max: Decimal, step: Decimal) -> SensitivityInput {
        SensitivityInput {
            base: Scenario::default(),
            variable,
            min,
            max,
            step,
            metric: OutputMetric::TotalInterestLifetime,
        }
    }

    #[test]
    fn test_extra_payment_sweep_decreases_interest() {
        let out = run_sensitivity(&sweep(
            SweepVariable::ExtraPayment,
            dec!(0),
            dec!(1000),
            dec!(250),
        ))
        .unwrap();
        let outputs: Vec<Decimal> = out.result.points.iter().map(|p| p.output).collect();
        assert_eq!(outputs.len(), 5);
        assert!(outputs.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(out.result.base_case_value, outputs[0]);
    }

    #[test]
    fn test_max_always_included() {
        let out = run_sensitivity(&sweep(
            SweepVariable::InterestRate,
            dec!(4),
            dec!(5),
            dec!(0.3),
        ))
        .unwrap();
        let values: Vec<Decimal> = out.result.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec!(4), dec!(4.3), dec!(4.6), dec!(4.9), dec!(5)]);
    }

    #[test]
    fn test_invalid_points_are_skipped() {
        let out = run_sensitivity(&sweep(
            SweepVariable::AnnualPrepayment,
            dec!(50),
            dec!(150),
            dec!(50),
        ))
        .unwrap();
        assert_eq!(out.result.points.len(), 2);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_bad_step_rejected() {
        assert!(run_sensitivity(&sweep(SweepVariable::ExtraPayment, dec!(0), dec!(10), dec!(0))).is_err());
        assert!(run_sensitivity(&sweep(SweepVariable::ExtraPayment, dec!(10), dec!(0), dec!(1))).is_err());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("extra_payment".parse::<SweepVariable>().unwrap(), SweepVariable::ExtraPayment);
        assert_eq!(
            "effective_amortization".parse::<OutputMetric>().unwrap(),
            OutputMetric::EffectiveAmortization
        );
        assert!("bogus".parse::<OutputMetric>().is_err());
    }

    #[test]
    fn test_overflowing_rate_point_is_skipped() {
        let input = SensitivityInput {
            base: Scenario {
                amortization_period: 2,
                term: 1,
                ..Scenario::default()
            },
            variable: SweepVariable::InterestRate,
            min: dec!(5.5),
            max: dec!(12000),
            step: dec!(11994.5),
            metric: OutputMetric::MonthlyPayment,
        };
        let out = run_sensitivity(&input).unwrap();
        assert_eq!(out.result.points.len(), 1);
        assert_eq!(out.result.points[0].value, dec!(5.5));
        assert!(out.warnings.iter().any(|w| w.contains("Skipped 12000")));
    }

    #[test]
    fn test_rounded_output_uses_cents() {
        let out = run_sensitivity(&sweep(
            SweepVariable::InterestRate,
            dec!(5),
            dec!(6),
            dec!(0.5),
        ))
        .unwrap()
        .result
        .rounded();
        assert!(out.points.iter().all(|p| p.output.scale() <= 2));
        assert_eq!(out.base_case_value, dec!(336904.99));
    }
}
