use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::RevShareResult;

/// Per-loan payout terms. Percentages are whole-number percents (1.70 = 1.70%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationParams {
    /// Lender rebate / origination payout as a percent of the loan amount
    pub rebate_pct: Rate,
    /// Percent of the gross rebate passed up the line (company split)
    #[serde(default)]
    pub upline_pct: Rate,
    /// Flat fee deducted per transaction
    #[serde(default)]
    pub transaction_fee: Money,
}

impl CompensationParams {
    pub fn validate(&self, context: &str) -> RevShareResult<()> {
        require_percent(&format!("{context}.rebate_pct"), self.rebate_pct)?;
        require_percent(&format!("{context}.upline_pct"), self.upline_pct)?;
        require_non_negative(&format!("{context}.transaction_fee"), self.transaction_fee)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationResult {
    pub net_comp: Money,
    pub annual_comp: Money,
}

/// loan × rebate% × (1 − upline%) − fee. May be negative when the fee exceeds the payout.
pub fn net_compensation(loan_amount: Money, params: &CompensationParams) -> Money {
    // Both fractions are at most one, so nothing here exceeds the loan amount
    let gross = loan_amount * (params.rebate_pct / Decimal::ONE_HUNDRED);
    let kept = Decimal::ONE - params.upline_pct / Decimal::ONE_HUNDRED;
    gross * kept - params.transaction_fee
}

/// Net compensation per loan and over `units` loans.
pub fn compensation(
    loan_amount: Money,
    params: &CompensationParams,
    units: Units,
) -> RevShareResult<CompensationResult> {
    require_non_negative("loan_amount", loan_amount)?;
    require_non_negative("units", units)?;
    params.validate("params")?;

    let net_comp = net_compensation(loan_amount, params);
    Ok(CompensationResult {
        net_comp,
        annual_comp: checked_product("annual_comp", net_comp, units)?,
    })
}
