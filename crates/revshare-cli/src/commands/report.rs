use clap::{Args, ValueEnum};
use serde_json::Value;

use revshare_core::report::{build_report, ReportKind, ReportOptions, ReportSection};
use revshare_core::revenue_share::summary::{calculate_revenue_share, RevenueShareInput};
use revshare_core::RateTable;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Simple,
    Detailed,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SectionArg {
    ExecutiveSummary,
    RevenueChart,
    LevelBreakdown,
}

impl From<SectionArg> for ReportSection {
    fn from(s: SectionArg) -> Self {
        match s {
            SectionArg::ExecutiveSummary => ReportSection::ExecutiveSummary,
            SectionArg::RevenueChart => ReportSection::RevenueChart,
            SectionArg::LevelBreakdown => ReportSection::LevelBreakdown,
        }
    }
}

/// Arguments for a revenue share report
#[derive(Args)]
pub struct ReportArgs {
    /// Path to a revenue share JSON input file (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Name of the person the report is prepared for
    #[arg(long)]
    pub name: String,

    #[arg(long, value_enum, default_value = "detailed")]
    pub kind: KindArg,

    /// Sections of a detailed report, comma-separated (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub sections: Option<Vec<SectionArg>>,
}

pub fn run_report(args: ReportArgs, table: &RateTable) -> Result<Value, Box<dyn std::error::Error>> {
    let summary_input: RevenueShareInput = input::read_input(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for report")?;

    let summary = calculate_revenue_share(table, &summary_input)?;
    let options = ReportOptions {
        kind: match args.kind {
            KindArg::Simple => ReportKind::Simple,
            KindArg::Detailed => ReportKind::Detailed,
        },
        sections: args
            .sections
            .map(|sections| sections.into_iter().map(ReportSection::from).collect()),
    };

    let document = build_report(&summary.result, &args.name, &options)?;
    let records = serde_json::to_value(summary.result.records())?;
    let mut value = serde_json::to_value(document)?;
    if let Value::Object(map) = &mut value {
        map.insert("records".into(), records);
    }
    Ok(value)
}
