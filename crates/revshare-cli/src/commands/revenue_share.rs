use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use revshare_core::revenue_share::level::{compute_level_share, LevelShareInput};
use revshare_core::revenue_share::profit_sharing::{
    calculate_profit_sharing, CompanyVolumeBasis, ProfitSharingInput,
};
use revshare_core::revenue_share::summary::{
    calculate_revenue_share, LevelInput, RevenueShareInput,
};
use revshare_core::{Level, RateTable, Title};

use crate::input;

/// Arguments for a single level's revenue share
#[derive(Args)]
pub struct LevelShareArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Title label or code, e.g. "DIR3"
    #[arg(long)]
    pub title: Option<Title>,

    /// Downline level (1-3)
    #[arg(long)]
    pub level: Option<i64>,

    /// Total loans closed at this level
    #[arg(long)]
    pub units: Option<Decimal>,

    /// Average loan size (defaults to the rate table's plan default)
    #[arg(long)]
    pub avg_loan_size: Option<Decimal>,

    /// Share of volume eligible for bonus, e.g. 0.80
    #[arg(long)]
    pub commission_fraction: Option<Decimal>,

    /// Flat generational bonus replacing the table value
    #[arg(long)]
    pub gen_bonus: Option<Decimal>,
}

pub fn run_level_share(
    args: LevelShareArgs,
    table: &RateTable,
) -> Result<Value, Box<dyn std::error::Error>> {
    let level_input: LevelShareInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let defaults = table.defaults();
            let title = args.title.ok_or("--title is required (or provide --input)")?;
            let level = args.level.ok_or("--level is required (or provide --input)")?;
            let units = args.units.ok_or("--units is required (or provide --input)")?;

            LevelShareInput {
                title,
                level: Level::try_from(level)?,
                units,
                avg_loan_size: args.avg_loan_size.unwrap_or(defaults.avg_loan_size),
                commission_fraction: args
                    .commission_fraction
                    .unwrap_or(defaults.commission_fraction),
                generation_bonus_override: args.gen_bonus,
            }
        }
    };

    let result = compute_level_share(table, &level_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for revenue share across every level of a title
#[derive(Args)]
pub struct RevShareArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Title label or code, e.g. "DIR3"
    #[arg(long)]
    pub title: Option<Title>,

    /// LO count per level, comma-separated from level 1 (e.g. "10,20,30")
    #[arg(long, value_delimiter = ',')]
    pub lo_counts: Option<Vec<u32>>,

    /// Loans per LO per level, comma-separated from level 1
    #[arg(long, value_delimiter = ',')]
    pub units_per_lo: Option<Vec<Decimal>>,

    #[arg(long)]
    pub avg_loan_size: Option<Decimal>,

    #[arg(long)]
    pub commission_fraction: Option<Decimal>,

    /// Flat generational bonus replacing the table values
    #[arg(long)]
    pub gen_bonus: Option<Decimal>,

    /// Total company volume for profit sharing
    #[arg(long)]
    pub company_volume: Option<Decimal>,

    /// Share of the profit sharing pool, e.g. 0.25
    #[arg(long)]
    pub profit_share: Option<Decimal>,
}

pub fn run_rev_share(
    args: RevShareArgs,
    table: &RateTable,
) -> Result<Value, Box<dyn std::error::Error>> {
    let summary_input: RevenueShareInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let title = args.title.ok_or("--title is required (or provide --input)")?;
            let lo_counts = args
                .lo_counts
                .ok_or("--lo-counts is required (or provide --input)")?;
            let units_per_lo = args
                .units_per_lo
                .ok_or("--units-per-lo is required (or provide --input)")?;

            RevenueShareInput {
                title,
                levels: team_levels(&lo_counts, &units_per_lo)?,
                avg_loan_size: args.avg_loan_size,
                commission_fraction: args.commission_fraction,
                generation_bonus_override: args.gen_bonus,
                company_volume: args.company_volume,
                profit_sharing_share: args.profit_share,
            }
        }
    };

    let result = calculate_revenue_share(table, &summary_input)?;
    let records = serde_json::to_value(result.result.records())?;
    let mut value = serde_json::to_value(result)?;
    if let Value::Object(map) = &mut value {
        map.insert("records".into(), records);
    }
    Ok(value)
}

/// Pair LO counts with loans per LO, level 1 first.
pub(crate) fn team_levels(
    lo_counts: &[u32],
    units_per_lo: &[Decimal],
) -> Result<Vec<LevelInput>, Box<dyn std::error::Error>> {
    if lo_counts.len() != units_per_lo.len() {
        return Err("--lo-counts and --units-per-lo must list the same number of levels".into());
    }
    if lo_counts.len() > Level::ALL.len() {
        return Err(format!("at most {} levels are supported", Level::ALL.len()).into());
    }

    Ok(Level::ALL
        .iter()
        .zip(lo_counts.iter().zip(units_per_lo))
        .map(|(&level, (&count, &units))| LevelInput::from_team(level, count, units))
        .collect())
}

/// Arguments for the company profit sharing bonus
#[derive(Args)]
pub struct ProfitSharingArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Total company funded volume
    #[arg(long)]
    pub company_volume: Option<Decimal>,

    /// Company LO headcount, used with --units-per-lo when no volume is given
    #[arg(long)]
    pub company_lo_count: Option<u32>,

    /// Annual loans per company LO
    #[arg(long)]
    pub units_per_lo: Option<Decimal>,

    #[arg(long)]
    pub avg_loan_size: Option<Decimal>,

    /// Pool rate applied to company volume
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Participant share of the pool, e.g. 0.25
    #[arg(long)]
    pub share: Option<Decimal>,
}

pub fn run_profit_sharing(
    args: ProfitSharingArgs,
    table: &RateTable,
) -> Result<Value, Box<dyn std::error::Error>> {
    let ps_input: ProfitSharingInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let defaults = table.defaults();
            let company_volume_basis = match (args.company_lo_count, args.units_per_lo) {
                (Some(count), Some(units)) => Some(CompanyVolumeBasis {
                    company_lo_count: count,
                    annual_units_per_lo: units,
                    avg_loan_size: args.avg_loan_size.unwrap_or(defaults.avg_loan_size),
                }),
                (None, None) => None,
                _ => {
                    return Err(
                        "--company-lo-count and --units-per-lo must be given together".into(),
                    )
                }
            };

            ProfitSharingInput {
                company_volume: args.company_volume,
                company_volume_basis,
                rate: args.rate,
                share: args.share,
            }
        }
    };

    let result = calculate_profit_sharing(&ps_input, table.defaults())?;
    Ok(serde_json::to_value(result)?)
}
