use napi::Result as NapiResult;
use napi_derive::napi;

mod handlers;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// Every export accepting `rate_table_toml` uses the built-in table when it
// is omitted, so caps and plan defaults agree across calls.

// ---------------------------------------------------------------------------
// Rate table
// ---------------------------------------------------------------------------

#[napi]
pub fn rate_table_json(rate_table_toml: Option<String>) -> NapiResult<String> {
    handlers::rate_table_json(rate_table_toml.as_deref()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Revenue share
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_level_share(
    input_json: String,
    rate_table_toml: Option<String>,
) -> NapiResult<String> {
    handlers::level_share(&input_json, rate_table_toml.as_deref()).map_err(to_napi_error)
}

#[napi]
pub fn calculate_revenue_share(
    input_json: String,
    rate_table_toml: Option<String>,
) -> NapiResult<String> {
    handlers::revenue_share(&input_json, rate_table_toml.as_deref()).map_err(to_napi_error)
}

/// Level rows keyed by the export column names, ready for a CSV writer.
#[napi]
pub fn revenue_share_records(
    input_json: String,
    rate_table_toml: Option<String>,
) -> NapiResult<String> {
    handlers::revenue_share_records(&input_json, rate_table_toml.as_deref())
        .map_err(to_napi_error)
}

#[napi]
pub fn calculate_profit_sharing(
    input_json: String,
    rate_table_toml: Option<String>,
) -> NapiResult<String> {
    handlers::profit_sharing(&input_json, rate_table_toml.as_deref()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Compensation
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_compensation(
    input_json: String,
    rate_table_toml: Option<String>,
) -> NapiResult<String> {
    handlers::comparison(&input_json, rate_table_toml.as_deref()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_team(input_json: String, rate_table_toml: Option<String>) -> NapiResult<String> {
    handlers::team(&input_json, rate_table_toml.as_deref()).map_err(to_napi_error)
}

#[napi]
pub fn team_template_csv() -> String {
    revshare_core::team::import::template_csv().to_string()
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[napi]
pub fn build_report(input_json: String, rate_table_toml: Option<String>) -> NapiResult<String> {
    handlers::report(&input_json, rate_table_toml.as_deref()).map_err(to_napi_error)
}
