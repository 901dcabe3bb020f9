use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rate_table::{Level, RateTable, Title};
use crate::types::*;
use crate::RevShareResult;

/// Input for a single level's revenue share
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelShareInput {
    pub title: Title,
    pub level: Level,
    /// Total loans closed at this level
    pub units: Units,
    pub avg_loan_size: Money,
    /// Share of volume eligible for bonus (0.80 = 80%)
    pub commission_fraction: Rate,
    /// Replaces the table's generational bonus for this level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_bonus_override: Option<Rate>,
}

/// Revenue share for one level. Values are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub level: Level,
    pub volume: Money,
    pub commissionable_volume: Money,
    pub bonus_rate: Rate,
    pub gen_bonus: Rate,
    pub rev_share: Money,
}

impl LevelResult {
    pub fn total_rate(&self) -> Rate {
        self.bonus_rate + self.gen_bonus
    }
}

/// volume × commission fraction × (level bonus + generational bonus)
pub fn compute_level_share(
    table: &RateTable,
    input: &LevelShareInput,
) -> RevShareResult<LevelResult> {
    require_non_negative("units", input.units)?;
    require_non_negative("avg_loan_size", input.avg_loan_size)?;
    require_fraction("commission_fraction", input.commission_fraction)?;
    if let Some(gen) = input.generation_bonus_override {
        require_non_negative("generation_bonus_override", gen)?;
    }

    let entry = table.lookup(input.title);
    let (bonus_rate, table_gen_bonus) = entry.level_rates(input.level);
    let gen_bonus = input.generation_bonus_override.unwrap_or(table_gen_bonus);

    let volume = checked_product("volume", input.units, input.avg_loan_size)?;
    let commissionable_volume = volume * input.commission_fraction;
    let rev_share = checked_product("rev_share", commissionable_volume, bonus_rate + gen_bonus)?;

    debug!(
        title = input.title.code(),
        level = input.level.number(),
        %volume,
        %rev_share,
        "computed level share"
    );

    Ok(LevelResult {
        level: input.level,
        volume,
        commissionable_volume,
        bonus_rate,
        gen_bonus,
        rev_share,
    })
}
