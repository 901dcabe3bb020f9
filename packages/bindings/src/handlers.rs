//! JSON request handling behind the napi exports. Every handler takes the
//! caller's JSON and an optional rate table document and returns JSON.

use serde::{Deserialize, Serialize};

use revshare_core::compensation::comparator::{calculate_comparison, ComparisonInput};
use revshare_core::rate_table::PlanDefaults;
use revshare_core::report::{build_report, ReportOptions};
use revshare_core::revenue_share::level::{compute_level_share, LevelShareInput};
use revshare_core::revenue_share::profit_sharing::{calculate_profit_sharing, ProfitSharingInput};
use revshare_core::revenue_share::summary::{calculate_revenue_share, RevenueShareInput};
use revshare_core::team::import::{import_csv, ImportReport};
use revshare_core::team::roster::{MemberInput, Roster, TeamPlanInput};
use revshare_core::team::totals::{calculate_team, TeamReport};
use revshare_core::{ComputationOutput, RateEntry, RateTable, RevShareResult};

/// The built-in table, or one parsed from the caller's TOML document.
pub fn rate_table(rate_table_toml: Option<&str>) -> RevShareResult<RateTable> {
    match rate_table_toml {
        Some(contents) => RateTable::from_toml_str(contents),
        None => RateTable::canonical(),
    }
}

#[derive(Serialize)]
struct RateTableView<'a> {
    version: &'a str,
    source: &'a str,
    defaults: &'a PlanDefaults,
    titles: Vec<TitleRates<'a>>,
}

#[derive(Serialize)]
struct TitleRates<'a> {
    title: &'static str,
    code: &'static str,
    #[serde(flatten)]
    rates: &'a RateEntry,
}

pub fn rate_table_json(rate_table_toml: Option<&str>) -> RevShareResult<String> {
    let table = rate_table(rate_table_toml)?;
    let view = RateTableView {
        version: table.version(),
        source: table.source(),
        defaults: table.defaults(),
        titles: table
            .entries()
            .map(|(title, rates)| TitleRates {
                title: title.label(),
                code: title.code(),
                rates,
            })
            .collect(),
    };
    Ok(serde_json::to_string(&view)?)
}

pub fn level_share(input_json: &str, rate_table_toml: Option<&str>) -> RevShareResult<String> {
    let table = rate_table(rate_table_toml)?;
    let input: LevelShareInput = serde_json::from_str(input_json)?;
    Ok(serde_json::to_string(&compute_level_share(&table, &input)?)?)
}

pub fn revenue_share(input_json: &str, rate_table_toml: Option<&str>) -> RevShareResult<String> {
    let table = rate_table(rate_table_toml)?;
    let input: RevenueShareInput = serde_json::from_str(input_json)?;
    Ok(serde_json::to_string(&calculate_revenue_share(&table, &input)?)?)
}

pub fn revenue_share_records(
    input_json: &str,
    rate_table_toml: Option<&str>,
) -> RevShareResult<String> {
    let table = rate_table(rate_table_toml)?;
    let input: RevenueShareInput = serde_json::from_str(input_json)?;
    let output = calculate_revenue_share(&table, &input)?;
    Ok(serde_json::to_string(&output.result.records())?)
}

pub fn profit_sharing(input_json: &str, rate_table_toml: Option<&str>) -> RevShareResult<String> {
    let table = rate_table(rate_table_toml)?;
    let input: ProfitSharingInput = serde_json::from_str(input_json)?;
    Ok(serde_json::to_string(&calculate_profit_sharing(&input, table.defaults())?)?)
}

pub fn comparison(input_json: &str, rate_table_toml: Option<&str>) -> RevShareResult<String> {
    let table = rate_table(rate_table_toml)?;
    let input: ComparisonInput = serde_json::from_str(input_json)?;
    Ok(serde_json::to_string(&calculate_comparison(&input, table.defaults())?)?)
}

#[derive(Deserialize)]
struct TeamRequest {
    plan: TeamPlanInput,
    /// Roster CSV text, imported before `members`
    #[serde(default)]
    csv: Option<String>,
    #[serde(default)]
    members: Vec<MemberInput>,
}

#[derive(Serialize)]
struct TeamResponse {
    import: Option<ImportReport>,
    #[serde(flatten)]
    output: ComputationOutput<TeamReport>,
}

pub fn team(input_json: &str, rate_table_toml: Option<&str>) -> RevShareResult<String> {
    let table = rate_table(rate_table_toml)?;
    let request: TeamRequest = serde_json::from_str(input_json)?;
    let mut roster = Roster::new(request.plan.resolve(table.defaults()))?;

    let import = match request.csv.as_deref() {
        Some(text) => Some(import_csv(&mut roster, text.as_bytes())?),
        None => None,
    };
    for member in request.members {
        roster.add_member(member)?;
    }

    let output = calculate_team(&roster)?;
    Ok(serde_json::to_string(&TeamResponse { import, output })?)
}

#[derive(Deserialize)]
struct ReportRequest {
    name: String,
    summary: RevenueShareInput,
    #[serde(default)]
    options: ReportOptions,
}

pub fn report(input_json: &str, rate_table_toml: Option<&str>) -> RevShareResult<String> {
    let table = rate_table(rate_table_toml)?;
    let request: ReportRequest = serde_json::from_str(input_json)?;
    let summary = calculate_revenue_share(&table, &request.summary)?;
    let document = build_report(&summary.result, &request.name, &request.options)?;
    Ok(serde_json::to_string(&document)?)
}
