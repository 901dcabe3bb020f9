mod commands;
mod input;
mod logger;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use revshare_core::RateTable;

use commands::compensation::CompareArgs;
use commands::rates::RatesArgs;
use commands::report::ReportArgs;
use commands::revenue_share::{LevelShareArgs, ProfitSharingArgs, RevShareArgs};
use commands::team::{TeamArgs, TeamTemplateArgs};

/// Multi-level revenue share and loan originator compensation calculations
#[derive(Parser)]
#[command(
    name = "revshare",
    version,
    about = "Multi-level revenue share and loan originator compensation calculations",
    long_about = "A CLI for revenue share compensation in a lending sales hierarchy \
                  with decimal precision. Supports per-level revenue share, profit \
                  sharing, capped sponsor compensation comparisons, team roster \
                  import and report generation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Rate table TOML file replacing the built-in table
    #[arg(long, global = true)]
    rate_table: Option<String>,

    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Revenue share for a single title and level
    LevelShare(LevelShareArgs),
    /// Revenue share across all levels, with profit sharing for eligible titles
    RevShare(RevShareArgs),
    /// Company profit sharing bonus
    ProfitSharing(ProfitSharingArgs),
    /// Compare current lender compensation against the capped sponsor plan
    Compare(CompareArgs),
    /// Import a team roster from CSV and compare every member
    Team(TeamArgs),
    /// Write the blank team import CSV
    TeamTemplate(TeamTemplateArgs),
    /// Build a revenue share report document
    Report(ReportArgs),
    /// List the rate table
    Rates(RatesArgs),
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

fn fail(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    let table = match cli.rate_table.as_deref() {
        Some(path) => RateTable::load(path),
        None => RateTable::canonical(),
    }
    .unwrap_or_else(|e| fail(e.into()));

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::LevelShare(args) => commands::revenue_share::run_level_share(args, &table),
        Commands::RevShare(args) => commands::revenue_share::run_rev_share(args, &table),
        Commands::ProfitSharing(args) => {
            commands::revenue_share::run_profit_sharing(args, &table)
        }
        Commands::Compare(args) => commands::compensation::run_compare(args, &table),
        Commands::Team(args) => commands::team::run_team(args, &table),
        Commands::TeamTemplate(args) => {
            if let Err(e) = commands::team::run_team_template(args) {
                fail(e);
            }
            return;
        }
        Commands::Report(args) => commands::report::run_report(args, &table),
        Commands::Rates(args) => commands::rates::run_rates(args, &table),
        Commands::Version => {
            println!("revshare {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}
