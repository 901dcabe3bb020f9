//! Display helpers. Calculations never round; these are applied only when
//! figures are rendered or exported for people.

use rust_decimal::{Decimal, RoundingStrategy};

/// `$1,234,567.89`, two decimal places, negatives as `-$445.00`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{frac}", group_thousands(whole))
}

/// A decimal rate as a percent with two places: 0.0011 → `0.11%`.
pub fn format_percent(rate: Decimal) -> String {
    let pct = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{pct:.2}%")
}

/// Counts without trailing zeros: `200`, `2.5`.
pub fn format_units(value: Decimal) -> String {
    value.normalize().to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
