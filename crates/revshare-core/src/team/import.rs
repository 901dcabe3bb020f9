use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use super::roster::{MemberInput, Roster};
use crate::error::RevShareError;
use crate::types::*;
use crate::RevShareResult;

pub const REQUIRED_COLUMNS: [&str; 3] = ["Name", "Loan Size", "Units"];

const TEMPLATE: &str = "Name,Loan Size,Units\nJohn Doe,450000,24\nJane Smith,525000,18\n";

/// A skipped row. `row` is the 1-based line number in the file (header is line 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    pub row: usize,
    pub reason: String,
}

impl From<ImportRowError> for RevShareError {
    fn from(e: ImportRowError) -> Self {
        RevShareError::ImportRow {
            row: e.row,
            reason: e.reason,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportReport {
    /// Fail on the first skipped row, for callers that want all-or-nothing.
    pub fn into_result(self) -> RevShareResult<usize> {
        match self.errors.into_iter().next() {
            Some(e) => Err(e.into()),
            None => Ok(self.imported),
        }
    }
}

/// The blank import file: the three required columns and two example rows.
pub fn template_csv() -> &'static str {
    TEMPLATE
}

/// Append every valid row to the roster. Missing required columns abort the
/// whole import; a bad row is skipped and reported.
pub fn import_csv<R: Read>(roster: &mut Roster, reader: R) -> RevShareResult<ImportReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| RevShareError::ImportFormat(format!("Unreadable header row: {e}")))?
        .clone();

    let mut columns = [0usize; 3];
    let mut missing: Vec<&str> = Vec::new();
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        match headers.iter().position(|h| h == name) {
            Some(idx) => *slot = idx,
            None => missing.push(name),
        }
    }
    if !missing.is_empty() {
        return Err(RevShareError::ImportFormat(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }
    let [name_col, loan_col, units_col] = columns;

    let mut report = ImportReport::default();
    for (i, record) in rdr.records().enumerate() {
        let row = i + 2;
        let outcome = record
            .map_err(|e| e.to_string())
            .and_then(|rec| {
                let field = |idx: usize| rec.get(idx).unwrap_or("").to_string();
                Ok(MemberInput {
                    name: field(name_col),
                    loan_size: parse_money(&field(loan_col))
                        .map_err(|reason| format!("Loan Size: {reason}"))?,
                    units: parse_units(&field(units_col))
                        .map_err(|reason| format!("Units: {reason}"))?,
                })
            })
            .and_then(|member| {
                roster
                    .add_member(member)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            });

        match outcome {
            Ok(()) => report.imported += 1,
            Err(reason) => {
                warn!(row, %reason, "skipping import row");
                report.errors.push(ImportRowError { row, reason });
            }
        }
    }

    info!(
        imported = report.imported,
        skipped = report.errors.len(),
        "team import finished"
    );
    Ok(report)
}

/// Read the file fully, then import it.
pub fn import_csv_path(roster: &mut Roster, path: impl AsRef<Path>) -> RevShareResult<ImportReport> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        RevShareError::ImportFormat(format!("Failed to read '{}': {}", path.display(), e))
    })?;
    import_csv(roster, bytes.as_slice())
}

/// Accepts plain decimals and spreadsheet-style currency ("$445,000").
fn parse_money(raw: &str) -> Result<Money, String> {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    let value = Decimal::from_str(cleaned.trim())
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if value < Decimal::ZERO {
        return Err(format!("'{raw}' is negative"));
    }
    Ok(value)
}

fn parse_units(raw: &str) -> Result<Units, String> {
    let value = Decimal::from_str(raw.trim()).map_err(|_| format!("'{raw}' is not a number"))?;
    if value < Decimal::ZERO {
        return Err(format!("'{raw}' is negative"));
    }
    if !value.fract().is_zero() {
        return Err(format!("'{raw}' is not a whole number of loans"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::roster::tests::sample_plan;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn roster() -> Roster {
        Roster::new(sample_plan()).unwrap()
    }

    #[test]
    fn test_template_round_trips() {
        let mut r = roster();
        let report = import_csv(&mut r, template_csv().as_bytes()).unwrap();
        assert_eq!(report.imported, 2);
        assert!(report.errors.is_empty());
        assert_eq!(r.members()[0].name, "John Doe");
        assert_eq!(r.members()[1].loan_size, dec!(525000));
    }

    #[test]
    fn test_template_has_exactly_required_columns() {
        let first = template_csv().lines().next().unwrap();
        assert_eq!(first, REQUIRED_COLUMNS.join(","));
        assert_eq!(template_csv().lines().count(), 3);
    }

    #[test]
    fn test_non_numeric_units_skipped() {
        let data = "Name,Loan Size,Units\nA,400000,12\nB,350000,twelve\nC,500000,8\n";
        let mut r = roster();
        let report = import_csv(&mut r, data.as_bytes()).unwrap();
        assert_eq!(report.imported, 2);
        assert_eq!(r.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row, 3);
        assert!(report.errors[0].reason.starts_with("Units"));
    }

    #[test]
    fn test_missing_column_aborts() {
        let data = "Name,Units\nA,12\n";
        let mut r = roster();
        let err = import_csv(&mut r, data.as_bytes()).unwrap_err();
        assert!(matches!(err, RevShareError::ImportFormat(ref m) if m.contains("Loan Size")));
        assert!(r.is_empty());
    }

    #[test]
    fn test_extra_columns_and_currency_formatting() {
        let data = "Region,Name,Units,Loan Size\nWest,A,10,\"$445,000\"\n";
        let mut r = roster();
        let report = import_csv(&mut r, data.as_bytes()).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(r.members()[0].loan_size, dec!(445000));
        assert_eq!(r.members()[0].units, dec!(10));
    }

    #[test]
    fn test_duplicate_and_blank_names_skipped() {
        let data = "Name,Loan Size,Units\nA,400000,12\nA,400000,3\n,400000,3\n";
        let mut r = roster();
        let report = import_csv(&mut r, data.as_bytes()).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].reason.contains("Duplicate"));
    }

    #[test]
    fn test_fractional_units_rejected() {
        assert!(parse_units("2.5").is_err());
        assert_eq!(parse_units("24").unwrap(), dec!(24));
        assert!(parse_money("-1").is_err());
    }

    #[test]
    fn test_into_result_surfaces_first_row_error() {
        let report = ImportReport {
            imported: 1,
            errors: vec![ImportRowError {
                row: 4,
                reason: "Units: 'x' is not a number".into(),
            }],
        };
        let err = report.into_result().unwrap_err();
        assert!(matches!(err, RevShareError::ImportRow { row: 4, .. }));
    }
}
