use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::rate_table::{PlanDefaults, RateEntry};
use crate::types::*;
use crate::RevShareResult;

/// Company volume built up from headcount rather than given directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyVolumeBasis {
    pub company_lo_count: u32,
    pub annual_units_per_lo: Units,
    pub avg_loan_size: Money,
}

impl CompanyVolumeBasis {
    pub fn company_volume(&self) -> RevShareResult<Money> {
        require_non_negative("annual_units_per_lo", self.annual_units_per_lo)?;
        require_non_negative("avg_loan_size", self.avg_loan_size)?;
        let units = checked_product(
            "company_volume_basis",
            Decimal::from(self.company_lo_count),
            self.annual_units_per_lo,
        )?;
        checked_product("company_volume_basis", units, self.avg_loan_size)
    }
}

/// Input for the company-wide profit sharing bonus
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfitSharingInput {
    /// Total company funded volume; defaults to the plan's company volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_volume: Option<Money>,
    /// Used when `company_volume` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_volume_basis: Option<CompanyVolumeBasis>,
    /// Pool rate applied to company volume; defaults to the plan's pool rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Rate>,
    /// Participant's share of the pool (0.25 = 25%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitSharingResult {
    pub company_volume: Money,
    pub rate: Rate,
    pub share: Rate,
    pub pool: Money,
    pub bonus: Money,
}

/// company_volume × rate × share
pub fn compute_profit_sharing(
    company_volume: Money,
    rate: Rate,
    share: Rate,
) -> RevShareResult<ProfitSharingResult> {
    require_non_negative("company_volume", company_volume)?;
    require_non_negative("rate", rate)?;
    require_fraction("share", share)?;

    let pool = checked_product("pool", company_volume, rate)?;
    Ok(ProfitSharingResult {
        company_volume,
        rate,
        share,
        pool,
        bonus: pool * share,
    })
}

/// Profit sharing for a title, or `None` when the title is not eligible.
pub fn profit_sharing_for(
    entry: &RateEntry,
    defaults: &PlanDefaults,
    company_volume: Option<Money>,
    share: Option<Rate>,
) -> RevShareResult<Option<ProfitSharingResult>> {
    if !entry.has_profit_share {
        return Ok(None);
    }
    compute_profit_sharing(
        company_volume.unwrap_or(defaults.company_volume),
        entry.profit_share_bonus,
        share.unwrap_or(defaults.profit_sharing_share),
    )
    .map(Some)
}

/// Standalone profit sharing calculation; omitted values come from `defaults`.
pub fn calculate_profit_sharing(
    input: &ProfitSharingInput,
    defaults: &PlanDefaults,
) -> RevShareResult<ComputationOutput<ProfitSharingResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let company_volume = match (input.company_volume, &input.company_volume_basis) {
        (Some(volume), basis) => {
            if basis.is_some() {
                warnings.push(
                    "Both company_volume and company_volume_basis given; using company_volume"
                        .into(),
                );
            }
            volume
        }
        (None, Some(basis)) => basis.company_volume()?,
        (None, None) => defaults.company_volume,
    };
    let rate = input.rate.unwrap_or(defaults.profit_sharing_rate);
    let share = input.share.unwrap_or(defaults.profit_sharing_share);

    let output = compute_profit_sharing(company_volume, rate, share)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Profit Sharing: company volume × pool rate × participant share",
        &serde_json::json!({
            "company_volume": company_volume.to_string(),
            "rate": rate.to_string(),
            "share": share.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RevShareError;
    use crate::rate_table::{RateTable, Title};
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_company_volume_known_answer() {
        let out = calculate_profit_sharing(&ProfitSharingInput::default(), &PlanDefaults::default()).unwrap();
        assert_eq!(out.result.company_volume, dec!(2136000000));
        assert_eq!(out.result.pool, dec!(213600));
        assert_eq!(out.result.bonus, dec!(53400));
    }

    #[test]
    fn test_company_volume_from_headcount() {
        // 200 LOs × 24 units × $400,000 = $1.92B; × 0.0001 × 0.25 = 48,000
        let input = ProfitSharingInput {
            company_volume_basis: Some(CompanyVolumeBasis {
                company_lo_count: 200,
                annual_units_per_lo: dec!(24),
                avg_loan_size: dec!(400000),
            }),
            ..Default::default()
        };
        let out = calculate_profit_sharing(&input, &PlanDefaults::default()).unwrap();
        assert_eq!(out.result.company_volume, dec!(1920000000));
        assert_eq!(out.result.bonus, dec!(48000));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_explicit_volume_wins_with_warning() {
        let input = ProfitSharingInput {
            company_volume: Some(dec!(1000000000)),
            company_volume_basis: Some(CompanyVolumeBasis {
                company_lo_count: 1,
                annual_units_per_lo: dec!(1),
                avg_loan_size: dec!(1),
            }),
            ..Default::default()
        };
        let out = calculate_profit_sharing(&input, &PlanDefaults::default()).unwrap();
        assert_eq!(out.result.company_volume, dec!(1000000000));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_omitted_values_come_from_table_defaults() {
        let doc = include_str!("../../data/rate_table.toml").replace(
            "company_volume = \"2136000000\"\nprofit_sharing_rate = \"0.0001\"\nprofit_sharing_share = \"0.25\"",
            "company_volume = \"1000000000\"\nprofit_sharing_rate = \"0.0002\"\nprofit_sharing_share = \"0.5\"",
        );
        let table = RateTable::from_toml_str(&doc).unwrap();
        assert_eq!(table.defaults().profit_sharing_rate, dec!(0.0002));

        // 1B × 0.0002 × 0.5
        let out = calculate_profit_sharing(&ProfitSharingInput::default(), table.defaults())
            .unwrap();
        assert_eq!(out.result.company_volume, dec!(1000000000));
        assert_eq!(out.result.rate, dec!(0.0002));
        assert_eq!(out.result.share, dec!(0.5));
        assert_eq!(out.result.bonus, dec!(100000));
    }

    #[test]
    fn test_oversized_headcount_basis_is_invalid_input() {
        let basis = CompanyVolumeBasis {
            company_lo_count: u32::MAX,
            annual_units_per_lo: dec!(1000000000000000),
            avg_loan_size: dec!(1000000000000000),
        };
        match basis.company_volume() {
            Err(RevShareError::InvalidInput { field, .. }) => {
                assert_eq!(field, "company_volume_basis")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_share_must_be_fraction() {
        assert!(compute_profit_sharing(dec!(1000), dec!(0.0001), dec!(25)).is_err());
    }

    #[test]
    fn test_ineligible_titles_get_nothing() {
        let table = RateTable::canonical().unwrap();
        for title in Title::ALL {
            let entry = table.lookup(title);
            let ps = profit_sharing_for(entry, table.defaults(), None, None).unwrap();
            assert_eq!(ps.is_some(), entry.has_profit_share, "{title}");
        }
        let dir3 = profit_sharing_for(
            table.lookup(Title::Director3),
            table.defaults(),
            None,
            None,
        )
        .unwrap()
        .unwrap();
        assert_eq!(dir3.bonus, dec!(53400));
    }
}
