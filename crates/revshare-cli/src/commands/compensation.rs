use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use revshare_core::compensation::comparator::{calculate_comparison, ComparisonInput};
use revshare_core::compensation::formula::CompensationParams;
use revshare_core::compensation::CapPolicy;
use revshare_core::RateTable;

use crate::input;

/// Current-lender and sponsor terms shared by `compare` and `team`
#[derive(Args, Debug, Clone)]
pub struct PlanFlags {
    /// Current lender rebate, percent of loan amount (e.g. 1.25)
    #[arg(long)]
    pub current_rebate: Option<Decimal>,

    /// Current lender upline split, percent
    #[arg(long, default_value = "0")]
    pub current_upline: Decimal,

    /// Current lender fee per transaction
    #[arg(long, default_value = "0")]
    pub current_fee: Decimal,

    /// Sponsor rebate before the cap, percent (e.g. 1.70)
    #[arg(long)]
    pub sponsor_rebate: Option<Decimal>,

    /// Sponsor upline split before the cap, percent
    #[arg(long, default_value = "0")]
    pub sponsor_upline: Decimal,

    /// Sponsor fee per transaction
    #[arg(long, default_value = "0")]
    pub sponsor_fee: Decimal,

    /// Sponsor rebate after the cap (defaults to the pre-cap rebate)
    #[arg(long)]
    pub post_cap_rebate: Option<Decimal>,

    /// Sponsor upline split after the cap
    #[arg(long, default_value = "0")]
    pub post_cap_upline: Decimal,

    /// Sponsor fee after the cap (defaults to the pre-cap fee)
    #[arg(long)]
    pub post_cap_fee: Option<Decimal>,

    /// Cap as annual loans per originator
    #[arg(long, conflicts_with = "cap_volume")]
    pub cap_units: Option<Decimal>,

    /// Cap as annual funded volume per originator
    #[arg(long)]
    pub cap_volume: Option<Decimal>,
}

impl PlanFlags {
    /// (current, sponsor before cap, sponsor after cap)
    pub fn params(
        &self,
    ) -> Result<(CompensationParams, CompensationParams, CompensationParams), Box<dyn std::error::Error>>
    {
        let current_rebate = self
            .current_rebate
            .ok_or("--current-rebate is required (or provide --input)")?;
        let sponsor_rebate = self
            .sponsor_rebate
            .ok_or("--sponsor-rebate is required (or provide --input)")?;

        let current = CompensationParams {
            rebate_pct: current_rebate,
            upline_pct: self.current_upline,
            transaction_fee: self.current_fee,
        };
        let before_cap = CompensationParams {
            rebate_pct: sponsor_rebate,
            upline_pct: self.sponsor_upline,
            transaction_fee: self.sponsor_fee,
        };
        let after_cap = CompensationParams {
            rebate_pct: self.post_cap_rebate.unwrap_or(sponsor_rebate),
            upline_pct: self.post_cap_upline,
            transaction_fee: self.post_cap_fee.unwrap_or(self.sponsor_fee),
        };
        Ok((current, before_cap, after_cap))
    }

    pub fn cap(&self) -> Option<CapPolicy> {
        match (self.cap_units, self.cap_volume) {
            (Some(units), _) => Some(CapPolicy::Units(units)),
            (None, Some(volume)) => Some(CapPolicy::Volume(volume)),
            (None, None) => None,
        }
    }
}

/// Arguments for a current vs sponsor compensation comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Average loan amount
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Loans closed per year
    #[arg(long)]
    pub units: Option<Decimal>,

    /// Note rate as a decimal (0.065 = 6.5%), adds the payment schedule
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in months (default 360)
    #[arg(long)]
    pub term_months: Option<u32>,

    #[command(flatten)]
    pub plan: PlanFlags,
}

pub fn run_compare(
    args: CompareArgs,
    table: &RateTable,
) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison_input: ComparisonInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let loan_amount = args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?;
            let units = args.units.ok_or("--units is required (or provide --input)")?;
            let (current, sponsor_before_cap, sponsor_after_cap) = args.plan.params()?;

            ComparisonInput {
                loan_amount,
                annual_units: units,
                current,
                sponsor_before_cap,
                sponsor_after_cap,
                interest_rate: args.interest_rate,
                term_months: args.term_months,
                cap: args.plan.cap(),
            }
        }
    };

    let result = calculate_comparison(&comparison_input, table.defaults())?;
    Ok(serde_json::to_value(result)?)
}
