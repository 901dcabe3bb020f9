use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compensation::comparator::{compare_compensation, ComparisonInput, ComparisonOutput};
use crate::compensation::formula::CompensationParams;
use crate::error::RevShareError;
use crate::rate_table::{CapPolicy, PlanDefaults};
use crate::types::*;
use crate::RevShareResult;

/// Compensation terms shared by every member of a roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPlan {
    pub current: CompensationParams,
    pub sponsor_before_cap: CompensationParams,
    pub sponsor_after_cap: CompensationParams,
    pub cap: CapPolicy,
}

/// Team terms as supplied by a caller; a missing cap comes from the deployment defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPlanInput {
    pub current: CompensationParams,
    pub sponsor_before_cap: CompensationParams,
    pub sponsor_after_cap: CompensationParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<CapPolicy>,
}

impl TeamPlanInput {
    pub fn resolve(self, defaults: &PlanDefaults) -> TeamPlan {
        TeamPlan {
            current: self.current,
            sponsor_before_cap: self.sponsor_before_cap,
            sponsor_after_cap: self.sponsor_after_cap,
            cap: self.cap.unwrap_or(defaults.cap),
        }
    }
}

impl TeamPlan {
    pub(crate) fn comparison_for(&self, loan_size: Money, units: Units) -> ComparisonInput {
        ComparisonInput {
            loan_amount: loan_size,
            annual_units: units,
            current: self.current,
            sponsor_before_cap: self.sponsor_before_cap,
            sponsor_after_cap: self.sponsor_after_cap,
            interest_rate: None,
            term_months: None,
            cap: Some(self.cap),
        }
    }

    /// Full comparison for one loan size / unit count under this plan.
    pub fn compare(&self, loan_size: Money, units: Units) -> RevShareResult<ComparisonOutput> {
        compare_compensation(&self.comparison_for(loan_size, units), self.cap)
    }
}

/// A member as entered or imported
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInput {
    pub name: String,
    pub loan_size: Money,
    pub units: Units,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub loan_size: Money,
    pub units: Units,
    pub volume: Money,
    /// Annual compensation at the current lender
    pub current_comp: Money,
    /// Annual compensation under the sponsor's capped terms
    pub sponsor_comp: Money,
}

/// Session-scoped, append-only team roster. Names are unique and
/// insertion order is preserved.
#[derive(Debug, Clone, Serialize)]
pub struct Roster {
    plan: TeamPlan,
    members: Vec<TeamMember>,
}

impl Roster {
    pub fn new(plan: TeamPlan) -> RevShareResult<Self> {
        plan.current.validate("current")?;
        plan.sponsor_before_cap.validate("sponsor_before_cap")?;
        plan.sponsor_after_cap.validate("sponsor_after_cap")?;
        Ok(Self {
            plan,
            members: Vec::new(),
        })
    }

    pub fn plan(&self) -> &TeamPlan {
        &self.plan
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m.name == name)
    }

    /// Compute the member's record and append it.
    pub fn add_member(&mut self, input: MemberInput) -> RevShareResult<&TeamMember> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(RevShareError::invalid("name", "Name cannot be empty"));
        }
        if self.contains(&name) {
            return Err(RevShareError::DuplicateMember(name));
        }
        require_non_negative("loan_size", input.loan_size)?;
        require_non_negative("units", input.units)?;

        let volume = checked_product("volume", input.units, input.loan_size)?;
        let comparison = self.plan.compare(input.loan_size, input.units)?;
        debug!(member = %name, %volume, "added team member");

        self.members.push(TeamMember {
            name,
            loan_size: input.loan_size,
            units: input.units,
            volume,
            current_comp: comparison.current_annual,
            sponsor_comp: comparison.total_sponsor_annual,
        });
        Ok(&self.members[self.members.len() - 1])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    pub(crate) fn sample_plan() -> TeamPlan {
        TeamPlan {
            current: CompensationParams {
                rebate_pct: dec!(1.50),
                upline_pct: dec!(30),
                transaction_fee: dec!(0),
            },
            sponsor_before_cap: CompensationParams {
                rebate_pct: dec!(1.70),
                upline_pct: dec!(25),
                transaction_fee: dec!(495),
            },
            sponsor_after_cap: CompensationParams {
                rebate_pct: dec!(1.70),
                upline_pct: dec!(0),
                transaction_fee: dec!(495),
            },
            cap: CapPolicy::Units(dec!(20)),
        }
    }

    fn member(name: &str, loan_size: Money, units: Units) -> MemberInput {
        MemberInput {
            name: name.into(),
            loan_size,
            units,
        }
    }

    #[test]
    fn test_add_member_computes_comp() {
        let mut roster = Roster::new(sample_plan()).unwrap();
        let m = roster.add_member(member("Jane Smith", dec!(500000), dec!(20))).unwrap();
        assert_eq!(m.volume, dec!(10000000));
        assert_eq!(m.current_comp, dec!(105000));
        assert_eq!(m.sponsor_comp, dec!(117600));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut roster = Roster::new(sample_plan()).unwrap();
        for name in ["Zed", "Amy", "Moe"] {
            roster.add_member(member(name, dec!(400000), dec!(5))).unwrap();
        }
        let names: Vec<&str> = roster.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Moe"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut roster = Roster::new(sample_plan()).unwrap();
        roster.add_member(member("Jane", dec!(400000), dec!(5))).unwrap();
        let err = roster.add_member(member(" Jane ", dec!(1), dec!(1))).unwrap_err();
        assert!(matches!(err, RevShareError::DuplicateMember(ref n) if n == "Jane"));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_negative_units_rejected() {
        let mut roster = Roster::new(sample_plan()).unwrap();
        assert!(roster.add_member(member("A", dec!(400000), dec!(-1))).is_err());
        assert!(roster.is_empty());
    }

    #[test]
    fn test_oversized_volume_rejected() {
        let mut roster = Roster::new(sample_plan()).unwrap();
        let err = roster
            .add_member(member("Big", dec!(100_000_000_000_000), dec!(1_000_000_000_000_000)))
            .unwrap_err();
        assert!(matches!(err, RevShareError::InvalidInput { ref field, .. } if field == "volume"));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_plan_input_takes_cap_from_defaults() {
        let plan = sample_plan();
        let input = TeamPlanInput {
            current: plan.current,
            sponsor_before_cap: plan.sponsor_before_cap,
            sponsor_after_cap: plan.sponsor_after_cap,
            cap: None,
        };
        let defaults = PlanDefaults {
            cap: CapPolicy::Volume(dec!(10000000)),
            ..PlanDefaults::default()
        };
        assert_eq!(input.resolve(&defaults).cap, CapPolicy::Volume(dec!(10000000)));

        let explicit = TeamPlanInput {
            cap: Some(CapPolicy::Units(dec!(12))),
            ..input
        };
        assert_eq!(explicit.resolve(&defaults).cap, CapPolicy::Units(dec!(12)));
    }

    #[test]
    fn test_invalid_plan_rejected() {
        let mut plan = sample_plan();
        plan.current.rebate_pct = dec!(-1);
        assert!(Roster::new(plan).is_err());
    }
}
