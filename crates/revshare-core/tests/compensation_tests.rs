#![cfg(feature = "compensation")]

use revshare_core::compensation::comparator::{
    calculate_comparison, compare_compensation, ComparisonInput,
};
use revshare_core::compensation::formula::{compensation, CompensationParams};
use revshare_core::compensation::CapPolicy;
use revshare_core::rate_table::PlanDefaults;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn params(rebate_pct: Decimal, upline_pct: Decimal, fee: Decimal) -> CompensationParams {
    CompensationParams {
        rebate_pct,
        upline_pct,
        transaction_fee: fee,
    }
}

fn comparison(annual_units: Decimal) -> ComparisonInput {
    ComparisonInput {
        loan_amount: dec!(500000),
        annual_units,
        current: params(dec!(1.25), dec!(20), dec!(0)),
        sponsor_before_cap: params(dec!(1.70), dec!(25), dec!(495)),
        sponsor_after_cap: params(dec!(1.70), dec!(0), dec!(495)),
        interest_rate: Some(dec!(0.0675)),
        term_months: None,
        cap: None,
    }
}

#[test]
fn test_net_comp_scenario() {
    let r = compensation(dec!(500000), &params(dec!(1.70), dec!(25), dec!(495)), dec!(20))
        .unwrap();
    assert_eq!(r.net_comp, dec!(5880));
    assert_eq!(r.annual_comp, dec!(117_600));
}

#[test]
fn test_cap_split_identity() {
    let cap = CapPolicy::default();
    let mut units = Decimal::ZERO;
    while units <= dec!(60) {
        let out = compare_compensation(&comparison(units), cap).unwrap();
        assert_eq!(out.before_cap_units + out.remaining_units, units);
        if units <= dec!(20) {
            assert_eq!(out.remaining_units, Decimal::ZERO);
        }
        assert_eq!(
            out.total_sponsor_annual,
            out.sponsor_before_annual + out.sponsor_after_annual
        );
        assert_eq!(out.delta, out.total_sponsor_annual - out.current_annual);
        units += dec!(0.5);
    }
}

#[test]
fn test_zero_units_scenario() {
    let out = calculate_comparison(&comparison(Decimal::ZERO), &PlanDefaults::default()).unwrap();
    let r = &out.result;
    assert_eq!(r.current_annual, Decimal::ZERO);
    assert_eq!(r.sponsor_before_annual, Decimal::ZERO);
    assert_eq!(r.sponsor_after_annual, Decimal::ZERO);
    assert_eq!(r.delta, Decimal::ZERO);
    assert!(r.delta_pct.is_none());
    assert!(r
        .monthly
        .iter()
        .all(|m| m.units.is_zero() && m.current_comp.is_zero() && m.sponsor_comp.is_zero()));
    assert!(out.warnings.iter().any(|w| w.contains("N/A")));
}

#[test]
fn test_comparison_json_shape() {
    let out = calculate_comparison(&comparison(dec!(24)), &PlanDefaults::default()).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["cap"], serde_json::json!({ "units": "20" }));
    assert_eq!(json["result"]["monthly"].as_array().unwrap().len(), 12);
    assert_eq!(json["result"]["first_year_schedule"].as_array().unwrap().len(), 12);
    assert!(json["result"]["delta_pct"].is_string());
}
