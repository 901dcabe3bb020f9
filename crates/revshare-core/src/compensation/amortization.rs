use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RevShareError;
use crate::types::*;
use crate::RevShareResult;

pub const DEFAULT_TERM_MONTHS: u32 = 360;

const MONTHS_PER_YEAR: Decimal = dec!(12);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

/// Level monthly principal and interest payment.
///
/// `annual_rate` is a decimal (0.065 = 6.5%). A zero rate repays principal linearly.
pub fn monthly_payment(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
) -> RevShareResult<Money> {
    require_non_negative("principal", principal)?;
    require_non_negative("interest_rate", annual_rate)?;
    if term_months == 0 {
        return Err(RevShareError::invalid("term_months", "Term must be at least one month"));
    }

    let n = Decimal::from(term_months);
    if annual_rate.is_zero() {
        return Ok(principal / n);
    }

    let r = annual_rate / MONTHS_PER_YEAR;
    let growth = (Decimal::ONE + r)
        .checked_powi(term_months as i64)
        .ok_or_else(|| RevShareError::invalid("interest_rate", "Compounding overflowed"))?;
    // P·r / (1 − (1 + r)^-n) keeps intermediates near the payment size
    let discount = Decimal::ONE
        .checked_div(growth)
        .ok_or_else(|| RevShareError::invalid("interest_rate", "Compounding overflowed"))?;
    let denominator = Decimal::ONE - discount;
    if denominator.is_zero() {
        return Err(RevShareError::DivisionByZero {
            context: "monthly payment annuity factor".into(),
        });
    }
    principal
        .checked_mul(r)
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| RevShareError::invalid("interest_rate", "Compounding overflowed"))
}

/// First `months` rows of the amortization schedule, capped at the term.
pub fn amortization_schedule(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    months: u32,
) -> RevShareResult<Vec<AmortizationRow>> {
    let payment = monthly_payment(principal, annual_rate, term_months)?;
    let r = annual_rate / MONTHS_PER_YEAR;

    let mut balance = principal;
    let mut rows = Vec::with_capacity(months.min(term_months) as usize);
    for month in 1..=months.min(term_months) {
        let interest = balance * r;
        let principal_paid = if month == term_months {
            balance
        } else {
            (payment - interest).min(balance)
        };
        balance -= principal_paid;
        rows.push(AmortizationRow {
            month,
            payment: principal_paid + interest,
            interest,
            principal: principal_paid,
            balance,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_year_payment() {
        // $500,000 at 6.5% over 30 years ≈ $3,160.34
        let payment = monthly_payment(dec!(500000), dec!(0.065), 360).unwrap();
        assert!((payment - dec!(3160.34)).abs() < dec!(0.01), "got {payment}");
    }

    #[test]
    fn test_zero_rate_is_linear() {
        let payment = monthly_payment(dec!(360000), Decimal::ZERO, 360).unwrap();
        assert_eq!(payment, dec!(1000));
    }

    #[test]
    fn test_very_high_rate_does_not_overflow() {
        // (1 + 2/12)^360 is ~1e24; the payment converges to interest-only
        let payment = monthly_payment(dec!(500000), dec!(2.0), 360).unwrap();
        let interest_only = dec!(500000) * dec!(2.0) / dec!(12);
        assert!((payment - interest_only).abs() < dec!(0.01), "got {payment}");

        let rows = amortization_schedule(dec!(500000), dec!(2.0), 360, 12).unwrap();
        assert_eq!(rows.len(), 12);
    }

    #[test]
    fn test_compounding_overflow_is_an_error() {
        let err = monthly_payment(dec!(500000), dec!(1000), 360).unwrap_err();
        assert!(matches!(err, RevShareError::InvalidInput { ref field, .. } if field == "interest_rate"));
    }

    #[test]
    fn test_zero_term_rejected() {
        assert!(monthly_payment(dec!(1000), dec!(0.05), 0).is_err());
    }

    #[test]
    fn test_schedule_balance_declines() {
        let rows = amortization_schedule(dec!(500000), dec!(0.065), 360, 12).unwrap();
        assert_eq!(rows.len(), 12);
        // First month interest: 500,000 × 0.065 / 12
        assert!((rows[0].interest - dec!(2708.33)).abs() < dec!(0.01));
        assert!(rows.windows(2).all(|w| w[1].balance < w[0].balance));
        for row in &rows {
            assert!((row.principal + row.interest - row.payment).abs() < dec!(0.000001));
        }
    }

    #[test]
    fn test_full_schedule_pays_off() {
        let rows = amortization_schedule(dec!(12000), dec!(0.06), 12, 24).unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows.last().unwrap().balance, Decimal::ZERO);
    }
}
