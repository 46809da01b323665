mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::calendar::ResolveDateArgs;
use commands::schedule::{FinalRowsArgs, ScheduleArgs};

/// Monthly loan amortization schedules
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Monthly loan amortization schedules",
    long_about = "Builds per-period amortization schedules for a batch of fixed-payment \
                  loans using actual-day simple interest on a 365-day year, with every \
                  money value rounded half-up to cents. Reads loans from CSV or JSON and \
                  can export the full schedule and a first/final row summary as CSV. \
                  Set RUST_LOG=info (or debug) for progress logging."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full amortization schedule for every loan
    Schedule(ScheduleArgs),
    /// Summarise each loan's first and final payment rows
    FinalRows(FinalRowsArgs),
    /// Resolve the payment date a number of months from a base date
    ResolveDate(ResolveDateArgs),
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

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::FinalRows(args) => commands::schedule::run_final_rows(args),
        Commands::ResolveDate(args) => commands::calendar::run_resolve_date(args),
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
