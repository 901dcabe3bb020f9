use serde::{Deserialize, Serialize};

use crate::error::RevShareError;
use crate::format::{format_currency, format_percent, format_units};
use crate::revenue_share::summary::{LevelBreakdown, RevenueShareOutput};
use crate::types::*;
use crate::RevShareResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Executive summary only
    Simple,
    #[default]
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    ExecutiveSummary,
    RevenueChart,
    LevelBreakdown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportOptions {
    #[serde(default)]
    pub kind: ReportKind,
    /// Sections of a detailed report; `None` includes all of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<ReportSection>>,
}

impl ReportOptions {
    fn includes(&self, section: ReportSection) -> bool {
        let selected = self
            .sections
            .as_ref()
            .map_or(true, |s| s.contains(&section));
        match self.kind {
            ReportKind::Simple => section == ReportSection::ExecutiveSummary && selected,
            ReportKind::Detailed => selected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueRow {
    pub label: String,
    pub value: String,
}

impl KeyValueRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// One bar of the revenue-by-level chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: Money,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailTable {
    pub heading: String,
    pub rows: Vec<KeyValueRow>,
}

/// Layout-free report content; renderers decide how it looks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub file_stem: String,
    pub executive_summary: Option<Vec<KeyValueRow>>,
    pub chart: Option<Vec<ChartPoint>>,
    pub level_details: Vec<DetailTable>,
}

pub fn build_report(
    summary: &RevenueShareOutput,
    name: &str,
    options: &ReportOptions,
) -> RevShareResult<ReportDocument> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RevShareError::invalid("name", "A name is required for the report"));
    }

    let executive_summary = options
        .includes(ReportSection::ExecutiveSummary)
        .then(|| executive_rows(summary));

    let chart = options.includes(ReportSection::RevenueChart).then(|| {
        summary
            .levels
            .iter()
            .map(|l| ChartPoint {
                label: l.level.to_string(),
                value: l.rev_share,
                display: format_currency(l.rev_share),
            })
            .collect()
    });

    let level_details = if options.includes(ReportSection::LevelBreakdown) {
        summary.levels.iter().map(detail_table).collect()
    } else {
        Vec::new()
    };

    Ok(ReportDocument {
        title: format!("Revenue Share Analysis for {name}"),
        file_stem: file_stem(name),
        executive_summary,
        chart,
        level_details,
    })
}

/// `revenue_share_jane_doe`
pub fn file_stem(name: &str) -> String {
    format!(
        "revenue_share_{}",
        name.trim().to_lowercase().replace(' ', "_")
    )
}

fn executive_rows(summary: &RevenueShareOutput) -> Vec<KeyValueRow> {
    let mut rows = vec![
        KeyValueRow::new("Title", summary.title.label()),
        KeyValueRow::new("Total Revenue Share", format_currency(summary.total_rev_share)),
        KeyValueRow::new("Total Loans", format_units(summary.total_loans)),
        KeyValueRow::new("Total Volume", format_currency(summary.total_volume)),
    ];
    if let (Some(ps), Some(total)) = (&summary.profit_sharing, summary.total_compensation) {
        rows.push(KeyValueRow::new("Profit Sharing", format_currency(ps.bonus)));
        rows.push(KeyValueRow::new("Total Compensation", format_currency(total)));
    }
    rows
}

fn detail_table(level: &LevelBreakdown) -> DetailTable {
    DetailTable {
        heading: format!("{} Analysis", level.level),
        rows: vec![
            KeyValueRow::new("LO Count", level.lo_count.to_string()),
            KeyValueRow::new(
                "Loans per LO",
                level.units_per_lo.map(format_units).unwrap_or_default(),
            ),
            KeyValueRow::new("Total Loans", format_units(level.total_units)),
            KeyValueRow::new("Volume", format_currency(level.volume)),
            KeyValueRow::new(
                "Commissionable Volume",
                format_currency(level.commissionable_volume),
            ),
            KeyValueRow::new("Level Bonus Rate", format_percent(level.bonus_rate)),
            KeyValueRow::new("Generational Bonus", format_percent(level.gen_bonus)),
            KeyValueRow::new("Revenue Share", format_currency(level.rev_share)),
        ],
    }
}
