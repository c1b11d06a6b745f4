mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::{io, process};
use tracing_subscriber::EnvFilter;

use commands::corporate_tax::CorporateTaxArgs;
use commands::income_tax::IncomeTaxArgs;
use commands::mortgage::MortgageArgs;

/// Jurisdictional tax and mortgage calculations
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Jurisdictional tax and mortgage calculations",
    long_about = "A CLI for personal income tax, corporate tax and mortgage calculations \
                  with decimal precision. Supports Canada, France, South Africa, the UK \
                  and Australia. Rules are supplied by the caller as JSON or YAML."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Net income after income tax and payroll contributions
    IncomeTax(IncomeTaxArgs),
    /// Corporate tax under the applicable regime
    CorporateTax(CorporateTaxArgs),
    /// Mortgage payment, fees and amortization schedule
    Mortgage(MortgageArgs),
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

/// Logs go to stderr so stdout carries only the formatted result.
/// `RUST_LOG`, when set, overrides `--log-level`.
fn init_logging(log_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .map_err(|e| format!("invalid --log-level '{log_level}': {e}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::IncomeTax(args) => commands::income_tax::run_income_tax(args),
        Commands::CorporateTax(args) => commands::corporate_tax::run_corporate_tax(args),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "calculation failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
