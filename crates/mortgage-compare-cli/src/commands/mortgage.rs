use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_compare_core::comparison::differences::{self, ComparisonInput};
use mortgage_compare_core::mortgage::amortization;
use mortgage_compare_core::mortgage::scenario::{DownPayment, PaymentFrequency, Scenario};

use crate::input;

/// Scenario parameters; unset flags fall back to the default scenario
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to JSON or YAML scenario file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Down payment as a dollar amount
    #[arg(long, conflicts_with = "down_payment_percent")]
    pub down_payment: Option<Decimal>,

    /// Down payment as a percentage of the purchase price
    #[arg(long)]
    pub down_payment_percent: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 5.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Amortization period in years
    #[arg(long)]
    pub amortization: Option<u32>,

    /// Term in years
    #[arg(long)]
    pub term: Option<u32>,

    /// monthly, biweekly, accelerated_biweekly, weekly, accelerated_weekly
    #[arg(long)]
    pub frequency: Option<PaymentFrequency>,

    /// Extra amount added to every payment
    #[arg(long)]
    pub extra_payment: Option<Decimal>,

    /// Payment increase in percent
    #[arg(long)]
    pub payment_increase: Option<Decimal>,

    /// Annual lump-sum prepayment, percent of the original principal
    #[arg(long)]
    pub annual_prepayment: Option<Decimal>,
}

impl ScenarioArgs {
    fn apply_to(&self, mut scenario: Scenario) -> Scenario {
        if let Some(price) = self.purchase_price {
            scenario.purchase_price = price;
        }
        if let Some(amount) = self.down_payment {
            scenario.down_payment = DownPayment::Amount(amount);
        }
        if let Some(pct) = self.down_payment_percent {
            scenario.down_payment = DownPayment::Percent(pct);
        }
        if let Some(rate) = self.rate {
            scenario.interest_rate = rate;
        }
        if let Some(years) = self.amortization {
            scenario.amortization_period = years;
        }
        if let Some(term) = self.term {
            scenario.term = term;
        }
        if let Some(freq) = self.frequency {
            scenario.payment_frequency = freq;
        }
        if let Some(extra) = self.extra_payment {
            scenario.extra_payment = extra;
        }
        if let Some(increase) = self.payment_increase {
            scenario.payment_increase = increase;
        }
        if let Some(prepay) = self.annual_prepayment {
            scenario.annual_prepayment = prepay;
        }
        scenario
    }
}

pub fn resolve_scenario(args: &ScenarioArgs) -> Result<Scenario, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        input::file::read_input(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Ok(args.apply_to(Scenario::default()))
    }
}

pub fn run_calculate(args: ScenarioArgs, exact: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = resolve_scenario(&args)?;
    let mut output = amortization::calculate_mortgage(&scenario)?;
    if !exact {
        output.result = output.result.rounded();
    }
    Ok(serde_json::to_value(output)?)
}

pub fn run_schedule(args: ScenarioArgs, exact: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = resolve_scenario(&args)?;
    let mut result = amortization::amortize(&scenario)?;
    if !exact {
        result = result.rounded();
    }
    Ok(serde_json::to_value(result.amortization_schedule)?)
}

/// Arguments for comparing two scenarios
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON or YAML file holding `scenario_a` and `scenario_b`
    #[arg(long, conflicts_with_all = ["scenario_a", "scenario_b"])]
    pub input: Option<String>,

    /// Path to scenario A file
    #[arg(long, requires = "scenario_b")]
    pub scenario_a: Option<String>,

    /// Path to scenario B file
    #[arg(long, requires = "scenario_a")]
    pub scenario_b: Option<String>,
}

pub fn run_compare(args: CompareArgs, exact: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let compare_input: ComparisonInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let (Some(a), Some(b)) = (&args.scenario_a, &args.scenario_b) {
        ComparisonInput {
            scenario_a: input::file::read_input(a)?,
            scenario_b: input::file::read_input(b)?,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err(
            "--input <file>, --scenario-a/--scenario-b or stdin required for compare".into(),
        );
    };

    let mut output = differences::compare_scenarios(&compare_input)?;
    if !exact {
        output.result = output.result.rounded();
    }
    Ok(serde_json::to_value(output)?)
}
