use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_compare_core::sensitivity::{self, OutputMetric, SensitivityInput, SweepVariable};

use crate::commands::mortgage::{resolve_scenario, ScenarioArgs};

/// Arguments for a one-way sensitivity sweep
#[derive(Args)]
pub struct SensitivityArgs {
    /// Base scenario
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Variable to sweep in format name:min:max:step
    /// (e.g. "extra_payment:0:1000:250")
    #[arg(long)]
    pub var: String,

    /// Output metric recorded at each point
    #[arg(long, default_value = "total_interest_lifetime")]
    pub metric: OutputMetric,
}

struct SweepSpec {
    variable: SweepVariable,
    min: Decimal,
    max: Decimal,
    step: Decimal,
}

fn parse_sweep(spec: &str) -> Result<SweepSpec, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            spec
        )
        .into());
    }
    Ok(SweepSpec {
        variable: parts[0].parse()?,
        min: parts[1].parse()?,
        max: parts[2].parse()?,
        step: parts[3].parse()?,
    })
}

pub fn run_sensitivity(
    args: SensitivityArgs,
    exact: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    let sweep = parse_sweep(&args.var)?;
    let base = resolve_scenario(&args.scenario)?;

    let input = SensitivityInput {
        base,
        variable: sweep.variable,
        min: sweep.min,
        max: sweep.max,
        step: sweep.step,
        metric: args.metric,
    };

    let mut output = sensitivity::run_sensitivity(&input)?;
    if !exact {
        output.result = output.result.rounded();
    }
    Ok(serde_json::to_value(output)?)
}
