mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::mortgage::{CompareArgs, ScenarioArgs};
use commands::sensitivity::SensitivityArgs;

/// Side-by-side mortgage amortization projections
#[derive(Parser)]
#[command(
    name = "mcalc",
    version,
    about = "Compare mortgage scenarios side by side",
    long_about = "A CLI for projecting mortgage amortization with decimal precision. \
                  Computes payments, term and lifetime interest, payoff time and \
                  yearly schedules, and compares two scenarios with different rates, \
                  terms, payment frequencies and prepayment strategies."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Report full decimal precision instead of rounding to cents
    #[arg(long, global = true)]
    exact: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a single scenario: payment, interest totals, payoff time
    Calculate(ScenarioArgs),
    /// Compare two scenarios (differences are B − A)
    Compare(CompareArgs),
    /// Print the year-by-year amortization schedule for a scenario
    Schedule(ScenarioArgs),
    /// Sweep one scenario input and report how a metric responds
    Sensitivity(SensitivityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("mortgage_compare_core=debug,mcalc=debug"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("mortgage_compare_core=warn"))
    };

    // stdout carries the result; logs go to stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exact = cli.exact;
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::mortgage::run_calculate(args, exact),
        Commands::Compare(args) => commands::mortgage::run_compare(args, exact),
        Commands::Schedule(args) => commands::mortgage::run_schedule(args, exact),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args, exact),
        Commands::Version => {
            println!("mcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
