use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::amortization::{amortization_schedule, AmortizationRow, DEFAULT_TERM_MONTHS};
use super::formula::{net_compensation, CompensationParams};
use crate::error::RevShareError;
use crate::rate_table::{CapPolicy, PlanDefaults};
use crate::types::*;
use crate::RevShareResult;

const MONTHS: u32 = 12;

/// One originator's current-lender terms against the sponsor's capped terms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub loan_amount: Money,
    pub annual_units: Units,
    pub current: CompensationParams,
    /// Sponsor terms for loans up to the cap
    pub sponsor_before_cap: CompensationParams,
    /// Sponsor terms for loans past the cap
    pub sponsor_after_cap: CompensationParams,
    /// Note rate as a decimal (0.065 = 6.5%), enables the payment schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
    /// Overrides the plan cap policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<CapPolicy>,
}

/// A month of the compensation projection, with loans spread evenly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCompensation {
    pub month: u32,
    pub units: Units,
    pub cumulative_units: Units,
    pub current_comp: Money,
    pub sponsor_comp: Money,
    pub cumulative_delta: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub cap: CapPolicy,
    pub current_net: Money,
    pub current_annual: Money,
    pub before_cap_units: Units,
    pub remaining_units: Units,
    pub sponsor_before_net: Money,
    pub sponsor_after_net: Money,
    pub sponsor_before_annual: Money,
    pub sponsor_after_annual: Money,
    pub total_sponsor_annual: Money,
    pub delta: Money,
    /// Percent change against current annual; `None` when current annual is zero
    pub delta_pct: Option<Rate>,
    /// First month in which cumulative loans reach the cap
    pub cap_reached_month: Option<u32>,
    pub monthly: Vec<MonthlyCompensation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<Money>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub first_year_schedule: Vec<AmortizationRow>,
}

/// Pure comparison under a given cap policy.
pub fn compare_compensation(
    input: &ComparisonInput,
    cap: CapPolicy,
) -> RevShareResult<ComparisonOutput> {
    require_non_negative("loan_amount", input.loan_amount)?;
    require_non_negative("annual_units", input.annual_units)?;
    input.current.validate("current")?;
    input.sponsor_before_cap.validate("sponsor_before_cap")?;
    input.sponsor_after_cap.validate("sponsor_after_cap")?;

    let current_net = net_compensation(input.loan_amount, &input.current);
    let current_annual = checked_product("current_annual", current_net, input.annual_units)?;

    let (before_cap_units, remaining_units) = cap.split_units(input.annual_units, input.loan_amount);
    let sponsor_before_net = net_compensation(input.loan_amount, &input.sponsor_before_cap);
    let sponsor_after_net = net_compensation(input.loan_amount, &input.sponsor_after_cap);
    let sponsor_before_annual =
        checked_product("sponsor_before_annual", sponsor_before_net, before_cap_units)?;
    let sponsor_after_annual =
        checked_product("sponsor_after_annual", sponsor_after_net, remaining_units)?;
    let total_sponsor_annual = checked_sum(
        "total_sponsor_annual",
        [sponsor_before_annual, sponsor_after_annual],
    )?;

    let delta = total_sponsor_annual
        .checked_sub(current_annual)
        .ok_or_else(|| RevShareError::invalid("delta", "Value is too large to compute"))?;
    let delta_pct = percent_change(delta, current_annual);

    let unit_cap = cap.unit_cap(input.loan_amount);
    let (monthly, cap_reached_month) = project_months(
        input.annual_units,
        unit_cap,
        current_net,
        sponsor_before_net,
        sponsor_after_net,
    );

    let (monthly_payment, first_year_schedule) = match input.interest_rate {
        Some(rate) => {
            let term = input.term_months.unwrap_or(DEFAULT_TERM_MONTHS);
            let schedule = amortization_schedule(input.loan_amount, rate, term, MONTHS)?;
            (schedule.first().map(|row| row.payment), schedule)
        }
        None => (None, Vec::new()),
    };

    debug!(%current_annual, %total_sponsor_annual, %delta, "compared compensation");

    Ok(ComparisonOutput {
        cap,
        current_net,
        current_annual,
        before_cap_units,
        remaining_units,
        sponsor_before_net,
        sponsor_after_net,
        sponsor_before_annual,
        sponsor_after_annual,
        total_sponsor_annual,
        delta,
        delta_pct,
        cap_reached_month,
        monthly,
        monthly_payment,
        first_year_schedule,
    })
}

/// Comparison with plan defaults and the standard output envelope.
pub fn calculate_comparison(
    input: &ComparisonInput,
    defaults: &PlanDefaults,
) -> RevShareResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let cap = input.cap.unwrap_or(defaults.cap);
    let output = compare_compensation(input, cap)?;

    if output.delta_pct.is_none() {
        warn!("current annual compensation is zero; percent delta reported as N/A");
        warnings.push("Current annual compensation is zero; percent change is N/A".into());
    }
    if output.sponsor_after_net < Decimal::ZERO && !output.remaining_units.is_zero() {
        warnings.push("Post-cap transaction fee exceeds the post-cap payout per loan".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Compensation comparison: current lender vs capped sponsor rebate",
        &serde_json::json!({
            "loan_amount": input.loan_amount.to_string(),
            "annual_units": input.annual_units.to_string(),
            "cap": cap,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// delta / baseline × 100, or `None` against a zero baseline.
pub fn percent_change(delta: Money, baseline: Money) -> Option<Rate> {
    if baseline.is_zero() {
        None
    } else {
        Some(delta / baseline.abs() * dec!(100))
    }
}

fn project_months(
    annual_units: Units,
    unit_cap: Option<Units>,
    current_net: Money,
    before_net: Money,
    after_net: Money,
) -> (Vec<MonthlyCompensation>, Option<u32>) {
    let months = Decimal::from(MONTHS);
    let sponsor_to_date = |cumulative: Units| match unit_cap {
        Some(cap) => {
            before_net * cumulative.min(cap) + after_net * (cumulative - cap).max(Decimal::ZERO)
        }
        None => before_net * cumulative,
    };

    let mut rows = Vec::with_capacity(MONTHS as usize);
    let mut cap_reached_month = None;
    let mut previous = Decimal::ZERO;
    for month in 1..=MONTHS {
        // Cumulative targets keep the twelve months summing to the annual count
        let cumulative = annual_units * (Decimal::from(month) / months);
        let units = cumulative - previous;
        let current_comp = current_net * cumulative - current_net * previous;
        let sponsor_comp = sponsor_to_date(cumulative) - sponsor_to_date(previous);
        let cumulative_delta = sponsor_to_date(cumulative) - current_net * cumulative;

        if cap_reached_month.is_none() && !annual_units.is_zero() {
            if let Some(cap) = unit_cap {
                if cumulative >= cap {
                    cap_reached_month = Some(month);
                }
            }
        }

        rows.push(MonthlyCompensation {
            month,
            units,
            cumulative_units: cumulative,
            current_comp,
            sponsor_comp,
            cumulative_delta,
        });
        previous = cumulative;
    }
    (rows, cap_reached_month)
}
