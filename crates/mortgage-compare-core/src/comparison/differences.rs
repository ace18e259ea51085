//! Side-by-side comparison of two scenarios.
//!
//! Differences are always B − A, except `time_shaved`, which is
//! A − B so that a positive value means scenario B pays off sooner.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::format::{round_money, round_years};
use crate::mortgage::amortization::{calculate_mortgage, MortgageResult};
use crate::mortgage::scenario::Scenario;
use crate::types::{with_metadata, ComputationOutput, Money, Years};
use crate::CalcResult;

/// The two scenarios being compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub scenario_a: Scenario,
    pub scenario_b: Scenario,
}

/// Pairwise field differences between two results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDifferences {
    pub monthly_payment: Money,
    pub total_interest_term: Money,
    pub total_interest_lifetime: Money,
    pub balance_at_end_of_term: Money,
    pub time_shaved: Years,
}

/// Which scenario comes out ahead on a single measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advantage {
    ScenarioA,
    ScenarioB,
    Even,
}

impl Advantage {
    /// For a B − A delta on a cost (payment, interest, balance): negative favours B.
    pub fn from_cost_delta(delta: Decimal) -> Advantage {
        if delta.is_sign_negative() && !delta.is_zero() {
            Advantage::ScenarioB
        } else if delta > Decimal::ZERO {
            Advantage::ScenarioA
        } else {
            Advantage::Even
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Advantage::ScenarioA => "Scenario A",
            Advantage::ScenarioB => "Scenario B",
            Advantage::Even => "Even",
        }
    }
}

impl ScenarioDifferences {
    pub fn payment_advantage(&self) -> Advantage {
        Advantage::from_cost_delta(self.monthly_payment)
    }

    pub fn interest_advantage(&self) -> Advantage {
        Advantage::from_cost_delta(self.total_interest_lifetime)
    }

    /// Positive time shaved means B pays off sooner.
    pub fn payoff_advantage(&self) -> Advantage {
        Advantage::from_cost_delta(-self.time_shaved)
    }
}

/// Both results and their differences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub scenario_a: MortgageResult,
    pub scenario_b: MortgageResult,
    pub differences: ScenarioDifferences,
}

impl Comparison {
    /// Copy rounded for display; differences are recomputed from the exact values.
    pub fn rounded(&self) -> Comparison {
        Comparison {
            scenario_a: self.scenario_a.rounded(),
            scenario_b: self.scenario_b.rounded(),
            differences: ScenarioDifferences {
                monthly_payment: round_money(self.differences.monthly_payment),
                total_interest_term: round_money(self.differences.total_interest_term),
                total_interest_lifetime: round_money(self.differences.total_interest_lifetime),
                balance_at_end_of_term: round_money(self.differences.balance_at_end_of_term),
                time_shaved: round_years(self.differences.time_shaved),
            },
        }
    }
}

/// B − A for each compared field; `time_shaved` is A − B.
pub fn differences(a: &MortgageResult, b: &MortgageResult) -> ScenarioDifferences {
    ScenarioDifferences {
        monthly_payment: b.monthly_payment - a.monthly_payment,
        total_interest_term: b.total_interest_term - a.total_interest_term,
        total_interest_lifetime: b.total_interest_lifetime - a.total_interest_lifetime,
        balance_at_end_of_term: b.balance_at_end_of_term - a.balance_at_end_of_term,
        time_shaved: a.effective_amortization - b.effective_amortization,
    }
}

/// Run the engine on both scenarios and diff the results.
pub fn compare_scenarios(
    input: &ComparisonInput,
) -> CalcResult<ComputationOutput<Comparison>> {
    let start = Instant::now();

    let a = calculate_mortgage(&input.scenario_a)?;
    let b = calculate_mortgage(&input.scenario_b)?;

    let warnings: Vec<String> = a
        .warnings
        .iter()
        .map(|w| format!("Scenario A: {w}"))
        .chain(b.warnings.iter().map(|w| format!("Scenario B: {w}")))
        .collect();

    let differences = differences(&a.result, &b.result);
    let output = Comparison {
        scenario_a: a.result,
        scenario_b: b.result,
        differences,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Side-by-Side Mortgage Comparison (B − A)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
