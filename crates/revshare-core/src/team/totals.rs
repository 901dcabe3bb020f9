use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::roster::Roster;
use crate::compensation::comparator::{percent_change, ComparisonOutput};
use crate::types::*;
use crate::RevShareResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTotals {
    pub member_count: usize,
    pub total_units: Units,
    pub total_volume: Money,
    /// Volume-weighted average loan size; zero for a roster with no units
    pub avg_loan_size: Money,
    /// Cap applied per member, then summed
    pub volume_before_cap: Money,
    pub volume_after_cap: Money,
    pub total_current_comp: Money,
    pub total_sponsor_comp: Money,
}

/// Full comparison for one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberComparison {
    pub name: String,
    pub comparison: ComparisonOutput,
}

/// Flat per-member line for tables and CSV export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub name: String,
    pub loan_size: Money,
    pub units: Units,
    pub volume: Money,
    pub volume_before_cap: Money,
    pub volume_after_cap: Money,
    pub current_comp: Money,
    pub sponsor_comp: Money,
    pub delta: Money,
    pub delta_pct: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub totals: TeamTotals,
    pub members: Vec<MemberSummary>,
}

pub fn team_totals(roster: &Roster) -> RevShareResult<TeamTotals> {
    let cap = roster.plan().cap;
    let mut totals = TeamTotals {
        member_count: roster.len(),
        total_units: Decimal::ZERO,
        total_volume: Decimal::ZERO,
        avg_loan_size: Decimal::ZERO,
        volume_before_cap: Decimal::ZERO,
        volume_after_cap: Decimal::ZERO,
        total_current_comp: Decimal::ZERO,
        total_sponsor_comp: Decimal::ZERO,
    };

    for member in roster.members() {
        let (before, after) = cap.split_volume(member.units, member.loan_size);
        totals.total_units = checked_sum("total_units", [totals.total_units, member.units])?;
        totals.total_volume = checked_sum("total_volume", [totals.total_volume, member.volume])?;
        totals.volume_before_cap =
            checked_sum("volume_before_cap", [totals.volume_before_cap, before])?;
        totals.volume_after_cap =
            checked_sum("volume_after_cap", [totals.volume_after_cap, after])?;
        totals.total_current_comp =
            checked_sum("total_current_comp", [totals.total_current_comp, member.current_comp])?;
        totals.total_sponsor_comp =
            checked_sum("total_sponsor_comp", [totals.total_sponsor_comp, member.sponsor_comp])?;
    }

    if !totals.total_units.is_zero() {
        totals.avg_loan_size = totals.total_volume / totals.total_units;
    }
    Ok(totals)
}

pub fn per_member_comparison(roster: &Roster) -> RevShareResult<Vec<MemberComparison>> {
    roster
        .members()
        .iter()
        .map(|m| {
            Ok(MemberComparison {
                name: m.name.clone(),
                comparison: roster.plan().compare(m.loan_size, m.units)?,
            })
        })
        .collect()
}

/// Totals plus flat member lines, in the standard envelope.
pub fn calculate_team(roster: &Roster) -> RevShareResult<ComputationOutput<TeamReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let cap = roster.plan().cap;

    let members: Vec<MemberSummary> = roster
        .members()
        .iter()
        .map(|m| {
            let (before, after) = cap.split_volume(m.units, m.loan_size);
            let delta = m.sponsor_comp - m.current_comp;
            let delta_pct = percent_change(delta, m.current_comp);
            if delta_pct.is_none() {
                warnings.push(format!(
                    "{}: current compensation is zero; percent change is N/A",
                    m.name
                ));
            }
            MemberSummary {
                name: m.name.clone(),
                loan_size: m.loan_size,
                units: m.units,
                volume: m.volume,
                volume_before_cap: before,
                volume_after_cap: after,
                current_comp: m.current_comp,
                sponsor_comp: m.sponsor_comp,
                delta,
                delta_pct,
            }
        })
        .collect();

    let output = TeamReport {
        totals: team_totals(roster)?,
        members,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Team aggregation: per-member cap split and compensation comparison",
        &serde_json::json!({
            "members": roster.len(),
            "cap": cap,
        }),
        warnings,
        elapsed,
        output,
    ))
}
