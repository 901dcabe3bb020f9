#![cfg(feature = "revenue_share")]

use revshare_core::revenue_share::level::{compute_level_share, LevelShareInput};
use revshare_core::revenue_share::profit_sharing::{compute_profit_sharing, profit_sharing_for};
use revshare_core::revenue_share::summary::{calculate_revenue_share, LevelInput, RevenueShareInput};
use revshare_core::{Level, RateTable, RevShareError, Title};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Level share
// ===========================================================================

fn level_input(title: Title, level: Level, units: Decimal) -> LevelShareInput {
    LevelShareInput {
        title,
        level,
        units,
        avg_loan_size: dec!(445000),
        commission_fraction: dec!(0.80),
        generation_bonus_override: None,
    }
}

#[test]
fn test_dir3_level1_scenario() {
    let table = RateTable::canonical().unwrap();
    let r = compute_level_share(&table, &level_input(Title::Director3, Level::One, dec!(200)))
        .unwrap();
    assert_eq!(r.volume, dec!(89_000_000));
    assert_eq!(r.commissionable_volume, dec!(71_200_000));
    assert_eq!(r.bonus_rate, dec!(0.001));
    assert_eq!(r.gen_bonus, dec!(0.0001));
    assert_eq!(r.rev_share, dec!(78_320));
}

#[test]
fn test_volume_identity_and_commissionable_bound() {
    let table = RateTable::canonical().unwrap();
    for title in Title::ALL {
        for level in Level::ALL {
            for units in [dec!(0), dec!(1), dec!(37), dec!(1200)] {
                for fraction in [dec!(0), dec!(0.20), dec!(0.80), dec!(1)] {
                    let mut input = level_input(title, level, units);
                    input.commission_fraction = fraction;
                    let r = compute_level_share(&table, &input).unwrap();
                    assert_eq!(r.volume, units * dec!(445000));
                    assert!(r.commissionable_volume <= r.volume);
                }
            }
        }
    }
}

#[test]
fn test_rev_share_linear_in_units() {
    let table = RateTable::canonical().unwrap();
    for title in Title::ALL {
        for level in Level::ALL {
            let base =
                compute_level_share(&table, &level_input(title, level, dec!(15))).unwrap();
            for k in [dec!(2), dec!(3), dec!(10)] {
                let scaled =
                    compute_level_share(&table, &level_input(title, level, dec!(15) * k))
                        .unwrap();
                assert_eq!(scaled.rev_share, base.rev_share * k, "{title} {level}");
            }
        }
    }
}

#[test]
fn test_invalid_level_number() {
    assert!(matches!(Level::try_from(0), Err(RevShareError::InvalidLevel(0))));
    assert!(matches!(Level::try_from(4), Err(RevShareError::InvalidLevel(4))));
}

#[test]
fn test_unknown_title_lookup() {
    let table = RateTable::canonical().unwrap();
    assert!(matches!(
        table.lookup_str("Director 9 (DIR9)"),
        Err(RevShareError::UnknownTitle(_))
    ));
}

// ===========================================================================
// Profit sharing
// ===========================================================================

#[test]
fn test_profit_sharing_scenario() {
    let r = compute_profit_sharing(dec!(2_136_000_000), dec!(0.0001), dec!(0.25)).unwrap();
    assert_eq!(r.bonus, dec!(53_400));
}

#[test]
fn test_profit_sharing_zero_for_ineligible_titles() {
    let table = RateTable::canonical().unwrap();
    for title in Title::ALL {
        let input = RevenueShareInput {
            title,
            levels: vec![
                LevelInput::from_team(Level::One, 10, dec!(10)),
                LevelInput::from_team(Level::Two, 20, dec!(20)),
                LevelInput::from_team(Level::Three, 30, dec!(30)),
            ],
            avg_loan_size: None,
            commission_fraction: None,
            generation_bonus_override: None,
            company_volume: None,
            profit_sharing_share: None,
        };
        let out = calculate_revenue_share(&table, &input).unwrap().result;
        let entry = table.lookup(title);
        let ps = profit_sharing_for(entry, table.defaults(), None, None).unwrap();
        if entry.has_profit_share {
            assert_eq!(out.total_compensation, Some(out.total_rev_share + ps.unwrap().bonus));
        } else {
            assert!(ps.is_none());
            assert!(out.profit_sharing.is_none());
            assert!(out.total_compensation.is_none());
        }
    }
}

// ===========================================================================
// Rate table variants
// ===========================================================================

#[test]
fn test_earlier_table_with_flat_generation_bonus() {
    let table = RateTable::from_toml_str(include_str!("../data/rate_table_v1.toml")).unwrap();
    let input = RevenueShareInput {
        title: Title::Director3,
        levels: vec![
            LevelInput {
                level: Level::One,
                lo_count: 10,
                units_per_lo: None,
                total_units: Some(dec!(200)),
                avg_loan_size: None,
            },
            LevelInput {
                level: Level::Two,
                lo_count: 20,
                units_per_lo: None,
                total_units: Some(dec!(480)),
                avg_loan_size: None,
            },
            LevelInput {
                level: Level::Three,
                lo_count: 30,
                units_per_lo: None,
                total_units: Some(dec!(510)),
                avg_loan_size: None,
            },
        ],
        avg_loan_size: None,
        commission_fraction: None,
        generation_bonus_override: Some(dec!(0.0001)),
        company_volume: None,
        profit_sharing_share: None,
    };
    let out = calculate_revenue_share(&table, &input).unwrap();
    let r = &out.result;
    // 20% commissionable: 17.8M × 0.0011, 42.72M × 0.0011, 45.39M × 0.0008
    assert_eq!(r.levels[0].rev_share, dec!(19580));
    assert_eq!(r.levels[1].rev_share, dec!(46992));
    assert_eq!(r.levels[2].rev_share, dec!(36312));
    assert_eq!(r.total_volume, dec!(529_550_000));
    assert_eq!(out.metadata.rate_table_version.as_deref(), Some("1"));
}

#[test]
fn test_json_input_with_codes() {
    let table = RateTable::canonical().unwrap();
    let json = serde_json::json!({
        "title": "DIR3",
        "levels": [
            { "level": 1, "lo_count": 10, "units_per_lo": "20" }
        ],
        "avg_loan_size": "445000"
    });
    let input: RevenueShareInput = serde_json::from_value(json).unwrap();
    let out = calculate_revenue_share(&table, &input).unwrap();
    assert_eq!(out.result.total_rev_share, dec!(78320));
}
