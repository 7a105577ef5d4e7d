mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::amortization::{LoanArgs, PaymentArgs};
use commands::interest::{
    ApyArgs, CompoundArgs, PresentValueArgs, SimpleInterestArgs, SimpleLoanArgs,
};
use commands::pricing::{MarginArgs, PriceArgs};

/// Consumer finance calculations
#[derive(Parser)]
#[command(
    name = "cfc",
    version,
    about = "Consumer finance calculations",
    long_about = "A CLI for consumer finance calculations with decimal precision. \
                  Supports amortization schedules with extra payments, loan summaries, \
                  APY, compound and simple interest, present value, and margin/markup."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Emit debug logs on stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Break one month's payment into interest and principal
    Payment(PaymentArgs),
    /// Build a month-by-month amortization schedule
    Schedule(LoanArgs),
    /// Compare a loan with and without extra payments
    LoanSummary(LoanArgs),
    /// Convert a nominal APR to APY
    Apy(ApyArgs),
    /// Future value under compound interest
    Compound(CompoundArgs),
    /// Discount a future amount to today
    PresentValue(PresentValueArgs),
    /// Simple interest on a principal
    SimpleInterest(SimpleInterestArgs),
    /// Add-on simple interest installment loan
    SimpleLoan(SimpleLoanArgs),
    /// Margin and markup from cost and price
    Margin(MarginArgs),
    /// Selling price for a target margin or markup
    Price(PriceArgs),
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

fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        format!("consumer_finance_core={level},cfc={level}").into()
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::LoanSummary(args) => commands::amortization::run_loan_summary(args),
        Commands::Apy(args) => commands::interest::run_apy(args),
        Commands::Compound(args) => commands::interest::run_compound(args),
        Commands::PresentValue(args) => commands::interest::run_present_value(args),
        Commands::SimpleInterest(args) => commands::interest::run_simple_interest(args),
        Commands::SimpleLoan(args) => commands::interest::run_simple_loan(args),
        Commands::Margin(args) => commands::pricing::run_margin(args),
        Commands::Price(args) => commands::pricing::run_price(args),
        Commands::Version => {
            println!("cfc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
