use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RevShareError;
use crate::RevShareResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.001 = 0.1%). Never as percentages.
pub type Rate = Decimal;

/// Loan counts. Fractional when spread across months or derived from a volume cap.
pub type Units = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
    /// Version of the rate table the figures were derived from, when one was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_table_version: Option<String>,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
            rate_table_version: None,
        },
    }
}

impl<T: Serialize> ComputationOutput<T> {
    /// Tag the envelope with the rate table version used.
    pub fn with_rate_table_version(mut self, version: &str) -> Self {
        self.metadata.rate_table_version = Some(version.to_string());
        self
    }
}

/// Reject negative values for a named input.
pub(crate) fn require_non_negative(field: &str, value: Decimal) -> RevShareResult<()> {
    if value < Decimal::ZERO {
        return Err(RevShareError::invalid(field, "Value cannot be negative"));
    }
    Ok(())
}

/// Reject values outside the closed unit interval.
pub(crate) fn require_fraction(field: &str, value: Decimal) -> RevShareResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RevShareError::invalid(
            field,
            "Must be a decimal fraction between 0 and 1",
        ));
    }
    Ok(())
}

/// Reject percentages outside 0..=100.
pub(crate) fn require_percent(field: &str, value: Decimal) -> RevShareResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(RevShareError::invalid(
            field,
            "Percentage must be between 0 and 100",
        ));
    }
    Ok(())
}

/// `a × b`, or `InvalidInput` on `field` when the product leaves Decimal range.
pub(crate) fn checked_product(field: &str, a: Decimal, b: Decimal) -> RevShareResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| RevShareError::invalid(field, "Value is too large to compute"))
}

/// Sum that reports overflow as `InvalidInput` on `field`.
pub(crate) fn checked_sum(
    field: &str,
    values: impl IntoIterator<Item = Decimal>,
) -> RevShareResult<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v)
            .ok_or_else(|| RevShareError::invalid(field, "Total is too large to compute"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_envelope_carries_rate_table_version() {
        let out = with_metadata("test", &serde_json::json!({}), vec![], 0, dec!(1))
            .with_rate_table_version("3");
        assert_eq!(out.metadata.rate_table_version.as_deref(), Some("3"));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_validators() {
        assert!(require_non_negative("x", dec!(0)).is_ok());
        assert!(require_non_negative("x", dec!(-0.01)).is_err());
        assert!(require_fraction("x", dec!(0.8)).is_ok());
        assert!(require_fraction("x", dec!(1.2)).is_err());
        assert!(require_percent("x", dec!(100)).is_ok());
        assert!(require_percent("x", dec!(100.5)).is_err());
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        assert_eq!(checked_product("x", dec!(3), dec!(4)).unwrap(), dec!(12));
        let err = checked_product("volume", Decimal::MAX, dec!(2)).unwrap_err();
        assert!(matches!(err, RevShareError::InvalidInput { ref field, .. } if field == "volume"));

        assert_eq!(checked_sum("t", [dec!(1), dec!(2)]).unwrap(), dec!(3));
        assert!(checked_sum("t", [Decimal::MAX, Decimal::MAX]).is_err());
    }
}
