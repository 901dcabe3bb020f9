use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::fs;
use tracing::info;

use revshare_core::team::import::{import_csv, import_csv_path, template_csv};
use revshare_core::team::roster::{MemberInput, Roster, TeamPlanInput};
use revshare_core::team::totals::calculate_team;
use revshare_core::RateTable;

use super::compensation::PlanFlags;
use crate::input;

/// Arguments for a team roster comparison
#[derive(Args)]
pub struct TeamArgs {
    /// Roster CSV with Name, Loan Size and Units columns (or pipe it on stdin)
    #[arg(long)]
    pub file: Option<String>,

    /// JSON file with the team plan (overrides the plan flags)
    #[arg(long)]
    pub plan_file: Option<String>,

    /// Extra member as "Name:loan_size:units"; repeatable
    #[arg(long = "add")]
    pub add: Vec<String>,

    /// Fail on the first rejected CSV row instead of skipping it
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub plan: PlanFlags,
}

pub fn run_team(args: TeamArgs, table: &RateTable) -> Result<Value, Box<dyn std::error::Error>> {
    let plan_input: TeamPlanInput = match args.plan_file.as_deref() {
        Some(path) => input::file::read_json(path)?,
        None => {
            let (current, sponsor_before_cap, sponsor_after_cap) = args.plan.params()?;
            TeamPlanInput {
                current,
                sponsor_before_cap,
                sponsor_after_cap,
                cap: args.plan.cap(),
            }
        }
    };
    let plan = plan_input.resolve(table.defaults());

    let mut roster = Roster::new(plan)?;
    let report = match args.file.as_deref() {
        Some(path) => Some(import_csv_path(&mut roster, path)?),
        None => match input::stdin::read_stdin_text()? {
            Some(text) => Some(import_csv(&mut roster, text.as_bytes())?),
            None => None,
        },
    };

    let mut warnings: Vec<String> = Vec::new();
    let mut import_summary = Value::Null;
    if let Some(report) = report {
        warnings.extend(
            report
                .errors
                .iter()
                .map(|e| format!("Row {} skipped: {}", e.row, e.reason)),
        );
        import_summary = serde_json::to_value(&report)?;
        if args.strict {
            report.into_result()?;
        }
    }

    for entry in &args.add {
        roster.add_member(parse_member(entry)?)?;
    }

    if roster.is_empty() {
        return Err("no team members: provide --file, pipe a CSV on stdin, or use --add".into());
    }
    info!(members = roster.len(), "team roster ready");

    let mut result = calculate_team(&roster)?;
    result.warnings.extend(warnings);
    let records = serde_json::to_value(&result.result.members)?;
    let mut value = serde_json::to_value(result)?;
    if let Value::Object(map) = &mut value {
        map.insert("import".into(), import_summary);
        map.insert("records".into(), records);
    }
    Ok(value)
}

/// "Name:loan_size:units"; the name may itself contain colons.
fn parse_member(entry: &str) -> Result<MemberInput, Box<dyn std::error::Error>> {
    let mut parts = entry.rsplitn(3, ':');
    let (units, loan_size, name) = match (parts.next(), parts.next(), parts.next()) {
        (Some(units), Some(loan), Some(name)) => (units, loan, name),
        _ => return Err(format!("--add expects Name:loan_size:units, got '{}'", entry).into()),
    };

    Ok(MemberInput {
        name: name.to_string(),
        loan_size: loan_size
            .trim()
            .parse::<Decimal>()
            .map_err(|e| format!("invalid loan size in '{}': {}", entry, e))?,
        units: units
            .trim()
            .parse::<Decimal>()
            .map_err(|e| format!("invalid units in '{}': {}", entry, e))?,
    })
}

/// Arguments for the blank import template
#[derive(Args)]
pub struct TeamTemplateArgs {
    /// Write the template to this path instead of stdout
    #[arg(long)]
    pub out: Option<String>,
}

pub fn run_team_template(args: TeamTemplateArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.out {
        Some(path) => {
            fs::write(&path, template_csv())
                .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
            info!(%path, "wrote team import template");
        }
        None => print!("{}", template_csv()),
    }
    Ok(())
}
