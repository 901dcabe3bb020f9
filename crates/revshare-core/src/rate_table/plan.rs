use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RevShareError;
use crate::types::*;
use crate::RevShareResult;

pub const DEFAULT_AVG_LOAN_SIZE: Money = dec!(445000);
pub const DEFAULT_COMMISSION_FRACTION: Rate = dec!(0.80);
pub const DEFAULT_COMPANY_VOLUME: Money = dec!(2136000000);
pub const DEFAULT_PROFIT_SHARING_RATE: Rate = dec!(0.0001);
pub const DEFAULT_PROFIT_SHARING_SHARE: Rate = dec!(0.25);
pub const DEFAULT_UNIT_CAP: Units = dec!(20);
pub const DEFAULT_VOLUME_CAP: Money = dec!(10000000);

/// Threshold past which sponsor compensation switches to post-cap parameters.
///
/// One policy drives every cap in a deployment: the per-originator comparison
/// and the team before/after-cap volume split both consult it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapPolicy {
    /// Annual unit cap per originator
    Units(Units),
    /// Annual funded volume cap per originator
    Volume(Money),
}

impl Default for CapPolicy {
    fn default() -> Self {
        CapPolicy::Units(DEFAULT_UNIT_CAP)
    }
}

impl CapPolicy {
    /// The cap expressed in units for an originator with the given loan size.
    ///
    /// A volume cap with a zero loan size can never be reached, so `None` is
    /// returned and every unit stays before the cap.
    pub fn unit_cap(&self, loan_amount: Money) -> Option<Units> {
        match *self {
            CapPolicy::Units(units) => Some(units),
            CapPolicy::Volume(volume) => {
                if loan_amount.is_zero() {
                    None
                } else {
                    Some(volume / loan_amount)
                }
            }
        }
    }

    /// Split annual units into (before cap, remaining after cap).
    pub fn split_units(&self, annual_units: Units, loan_amount: Money) -> (Units, Units) {
        match self.unit_cap(loan_amount) {
            Some(cap) => {
                let before = annual_units.min(cap);
                let remaining = (annual_units - cap).max(Decimal::ZERO);
                (before, remaining)
            }
            None => (annual_units, Decimal::ZERO),
        }
    }

    /// Split an originator's funded volume into (before cap, after cap).
    /// The two parts always sum to `units × loan_amount`.
    pub fn split_volume(&self, units: Units, loan_amount: Money) -> (Money, Money) {
        let volume = units * loan_amount;
        let before = match *self {
            CapPolicy::Units(cap) => units.min(cap) * loan_amount,
            CapPolicy::Volume(cap) => volume.min(cap),
        };
        (before, volume - before)
    }

    pub(crate) fn validate(&self) -> RevShareResult<()> {
        match *self {
            CapPolicy::Units(u) => require_non_negative("cap.units", u),
            CapPolicy::Volume(v) => require_non_negative("cap.volume", v),
        }
    }
}

/// Deployment-wide defaults applied when a caller leaves a parameter out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanDefaults {
    pub avg_loan_size: Money,
    /// Share of volume eligible for bonus; the dashboards disagree (0.20 vs 0.80)
    pub commission_fraction: Rate,
    pub company_volume: Money,
    /// Pool rate for the standalone profit sharing calculation
    pub profit_sharing_rate: Rate,
    pub profit_sharing_share: Rate,
    pub cap: CapPolicy,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            avg_loan_size: DEFAULT_AVG_LOAN_SIZE,
            commission_fraction: DEFAULT_COMMISSION_FRACTION,
            company_volume: DEFAULT_COMPANY_VOLUME,
            profit_sharing_rate: DEFAULT_PROFIT_SHARING_RATE,
            profit_sharing_share: DEFAULT_PROFIT_SHARING_SHARE,
            cap: CapPolicy::default(),
        }
    }
}

impl PlanDefaults {
    pub(crate) fn validate(&self) -> RevShareResult<()> {
        require_non_negative("defaults.avg_loan_size", self.avg_loan_size)?;
        require_fraction("defaults.commission_fraction", self.commission_fraction)?;
        require_non_negative("defaults.company_volume", self.company_volume)?;
        require_non_negative("defaults.profit_sharing_rate", self.profit_sharing_rate)?;
        require_fraction("defaults.profit_sharing_share", self.profit_sharing_share)?;
        self.cap.validate().map_err(|e| RevShareError::RateTable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cap_split() {
        let cap = CapPolicy::default();
        assert_eq!(cap.split_units(dec!(15), dec!(500000)), (dec!(15), dec!(0)));
        assert_eq!(cap.split_units(dec!(20), dec!(500000)), (dec!(20), dec!(0)));
        assert_eq!(cap.split_units(dec!(32), dec!(500000)), (dec!(20), dec!(12)));
    }

    #[test]
    fn test_volume_cap_converts_to_units() {
        let cap = CapPolicy::Volume(DEFAULT_VOLUME_CAP);
        // $10M / $400k = 25 units
        assert_eq!(cap.unit_cap(dec!(400000)), Some(dec!(25)));
        assert_eq!(cap.split_units(dec!(30), dec!(400000)), (dec!(25), dec!(5)));
    }

    #[test]
    fn test_volume_cap_zero_loan_size_never_caps() {
        let cap = CapPolicy::Volume(DEFAULT_VOLUME_CAP);
        assert_eq!(cap.unit_cap(Decimal::ZERO), None);
        assert_eq!(cap.split_units(dec!(30), Decimal::ZERO), (dec!(30), dec!(0)));
    }

    #[test]
    fn test_split_volume_sums_to_volume() {
        for cap in [CapPolicy::default(), CapPolicy::Volume(DEFAULT_VOLUME_CAP)] {
            for units in [dec!(0), dec!(5), dec!(20), dec!(22.5), dec!(40)] {
                let (before, after) = cap.split_volume(units, dec!(445000));
                assert_eq!(before + after, units * dec!(445000));
                assert!(after >= Decimal::ZERO);
            }
        }
        let (before, after) =
            CapPolicy::Volume(DEFAULT_VOLUME_CAP).split_volume(dec!(30), dec!(500000));
        assert_eq!((before, after), (dec!(10000000), dec!(5000000)));
    }

    #[test]
    fn test_cap_policy_serde_shape() {
        let json = serde_json::to_value(CapPolicy::Volume(dec!(10000000))).unwrap();
        assert_eq!(json, serde_json::json!({ "volume": "10000000" }));
    }
}
