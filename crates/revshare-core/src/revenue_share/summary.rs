use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::level::{compute_level_share, LevelShareInput};
use super::profit_sharing::{profit_sharing_for, ProfitSharingResult};
use crate::error::RevShareError;
use crate::rate_table::{Level, RateTable, Title};
use crate::types::*;
use crate::RevShareResult;

/// Team structure at one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelInput {
    pub level: Level,
    #[serde(default)]
    pub lo_count: u32,
    /// Loans per LO; total units = lo_count × units_per_lo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_per_lo: Option<Units>,
    /// Total loans at this level, taking precedence over units_per_lo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_units: Option<Units>,
    /// Overrides the plan-wide average loan size for this level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_loan_size: Option<Money>,
}

impl LevelInput {
    pub fn from_team(level: Level, lo_count: u32, units_per_lo: Units) -> Self {
        Self {
            level,
            lo_count,
            units_per_lo: Some(units_per_lo),
            total_units: None,
            avg_loan_size: None,
        }
    }

    pub fn total_units(&self) -> RevShareResult<Units> {
        match (self.total_units, self.units_per_lo) {
            (Some(total), _) => {
                require_non_negative("total_units", total)?;
                Ok(total)
            }
            (None, Some(per_lo)) => {
                require_non_negative("units_per_lo", per_lo)?;
                checked_product("units_per_lo", Decimal::from(self.lo_count), per_lo)
            }
            (None, None) => Err(RevShareError::invalid(
                format!("levels[{}]", self.level.number()),
                "Either total_units or units_per_lo is required",
            )),
        }
    }

    fn units_per_lo(&self, total_units: Units) -> Option<Units> {
        self.units_per_lo.or_else(|| {
            (self.lo_count > 0).then(|| total_units / Decimal::from(self.lo_count))
        })
    }
}

/// Input for a full three-level revenue share run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueShareInput {
    pub title: Title,
    pub levels: Vec<LevelInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_loan_size: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_fraction: Option<Rate>,
    /// Flat generational bonus replacing the table's per-level values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_bonus_override: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_volume: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_sharing_share: Option<Rate>,
}

/// Per-level line of the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelBreakdown {
    pub level: Level,
    pub lo_count: u32,
    pub units_per_lo: Option<Units>,
    pub total_units: Units,
    pub avg_loan_size: Money,
    pub volume: Money,
    pub commissionable_volume: Money,
    pub bonus_rate: Rate,
    pub gen_bonus: Rate,
    pub rev_share: Money,
}

/// Flat export row; field names are the CSV column headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "LO Count")]
    pub lo_count: u32,
    #[serde(rename = "Loans per LO")]
    pub loans_per_lo: Option<Units>,
    #[serde(rename = "Total Loans")]
    pub total_loans: Units,
    #[serde(rename = "Volume")]
    pub volume: Money,
    #[serde(rename = "Commissionable Volume")]
    pub commissionable_volume: Money,
    #[serde(rename = "Bonus Rate")]
    pub bonus_rate: Rate,
    #[serde(rename = "Gen Bonus")]
    pub gen_bonus: Rate,
    #[serde(rename = "Rev Share")]
    pub rev_share: Money,
}

impl From<&LevelBreakdown> for LevelRecord {
    fn from(b: &LevelBreakdown) -> Self {
        Self {
            level: b.level.to_string(),
            lo_count: b.lo_count,
            loans_per_lo: b.units_per_lo,
            total_loans: b.total_units,
            volume: b.volume,
            commissionable_volume: b.commissionable_volume,
            bonus_rate: b.bonus_rate,
            gen_bonus: b.gen_bonus,
            rev_share: b.rev_share,
        }
    }
}

/// Output of a full revenue share run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueShareOutput {
    pub title: Title,
    pub levels: Vec<LevelBreakdown>,
    pub total_loans: Units,
    pub total_volume: Money,
    pub total_commissionable_volume: Money,
    pub total_rev_share: Money,
    /// Present only for profit-sharing titles
    pub profit_sharing: Option<ProfitSharingResult>,
    /// Revenue share plus profit sharing, present only for profit-sharing titles
    pub total_compensation: Option<Money>,
}

impl RevenueShareOutput {
    pub fn records(&self) -> Vec<LevelRecord> {
        self.levels.iter().map(LevelRecord::from).collect()
    }
}

/// Run every level for a title and total the results.
pub fn calculate_revenue_share(
    table: &RateTable,
    input: &RevenueShareInput,
) -> RevShareResult<ComputationOutput<RevenueShareOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let defaults = table.defaults();

    if input.levels.is_empty() {
        return Err(RevShareError::invalid("levels", "At least one level is required"));
    }

    let mut levels_in: Vec<&LevelInput> = input.levels.iter().collect();
    levels_in.sort_by_key(|l| l.level);
    if let Some(dup) = levels_in.windows(2).find(|w| w[0].level == w[1].level) {
        return Err(RevShareError::invalid(
            "levels",
            format!("{} listed more than once", dup[0].level),
        ));
    }

    let avg_loan_size = input.avg_loan_size.unwrap_or(defaults.avg_loan_size);
    let commission_fraction = input
        .commission_fraction
        .unwrap_or(defaults.commission_fraction);

    let mut levels: Vec<LevelBreakdown> = Vec::with_capacity(levels_in.len());
    for level_input in levels_in {
        let total_units = level_input.total_units()?;
        let level_loan_size = level_input.avg_loan_size.unwrap_or(avg_loan_size);
        let share = compute_level_share(
            table,
            &LevelShareInput {
                title: input.title,
                level: level_input.level,
                units: total_units,
                avg_loan_size: level_loan_size,
                commission_fraction,
                generation_bonus_override: input.generation_bonus_override,
            },
        )?;

        if !share.volume.is_zero() && share.total_rate().is_zero() {
            warnings.push(format!(
                "{} volume earns no revenue share at {}",
                share.level, input.title
            ));
        }

        levels.push(LevelBreakdown {
            level: share.level,
            lo_count: level_input.lo_count,
            units_per_lo: level_input.units_per_lo(total_units),
            total_units,
            avg_loan_size: level_loan_size,
            volume: share.volume,
            commissionable_volume: share.commissionable_volume,
            bonus_rate: share.bonus_rate,
            gen_bonus: share.gen_bonus,
            rev_share: share.rev_share,
        });
    }

    let total_loans = checked_sum("total_loans", levels.iter().map(|l| l.total_units))?;
    let total_volume = checked_sum("total_volume", levels.iter().map(|l| l.volume))?;
    let total_commissionable_volume = checked_sum(
        "total_commissionable_volume",
        levels.iter().map(|l| l.commissionable_volume),
    )?;
    let total_rev_share = checked_sum("total_rev_share", levels.iter().map(|l| l.rev_share))?;

    let profit_sharing = profit_sharing_for(
        table.lookup(input.title),
        defaults,
        input.company_volume,
        input.profit_sharing_share,
    )?;
    let total_compensation = profit_sharing
        .as_ref()
        .map(|ps| checked_sum("total_compensation", [total_rev_share, ps.bonus]))
        .transpose()?;

    let output = RevenueShareOutput {
        title: input.title,
        levels,
        total_loans,
        total_volume,
        total_commissionable_volume,
        total_rev_share,
        profit_sharing,
        total_compensation,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multi-level revenue share: commissionable volume × (level bonus + generational bonus)",
        &serde_json::json!({
            "title": input.title.label(),
            "avg_loan_size": avg_loan_size.to_string(),
            "commission_fraction": commission_fraction.to_string(),
            "generation_bonus_override": input.generation_bonus_override.map(|g| g.to_string()),
        }),
        warnings,
        elapsed,
        output,
    )
    .with_rate_table_version(table.version()))
}
