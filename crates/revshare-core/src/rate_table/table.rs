use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::level::Level;
use super::plan::PlanDefaults;
use super::title::Title;
use crate::error::RevShareError;
use crate::types::*;
use crate::RevShareResult;

const CANONICAL_TABLE: &str = include_str!("../../data/rate_table.toml");

/// Bonus rates for one title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateEntry {
    pub level1_bonus: Rate,
    pub level2_bonus: Rate,
    pub level3_bonus: Rate,
    pub level1_gen_bonus: Rate,
    pub level2_gen_bonus: Rate,
    pub level3_gen_bonus: Rate,
    pub has_profit_share: bool,
    /// Profit sharing rate applied to company volume when eligible
    pub profit_share_bonus: Rate,
}

impl RateEntry {
    /// (base bonus rate, generational bonus) for a level.
    pub fn level_rates(&self, level: Level) -> (Rate, Rate) {
        match level {
            Level::One => (self.level1_bonus, self.level1_gen_bonus),
            Level::Two => (self.level2_bonus, self.level2_gen_bonus),
            Level::Three => (self.level3_bonus, self.level3_gen_bonus),
        }
    }

    fn validate(&self, code: &str) -> RevShareResult<()> {
        let rates = [
            ("level1_bonus", self.level1_bonus),
            ("level2_bonus", self.level2_bonus),
            ("level3_bonus", self.level3_bonus),
            ("level1_gen_bonus", self.level1_gen_bonus),
            ("level2_gen_bonus", self.level2_gen_bonus),
            ("level3_gen_bonus", self.level3_gen_bonus),
            ("profit_share_bonus", self.profit_share_bonus),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO {
                return Err(RevShareError::RateTable(format!(
                    "{code}.{name} is negative ({rate})"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RateTableFile {
    version: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    defaults: PlanDefaults,
    titles: BTreeMap<String, RateEntry>,
}

/// Versioned mapping from every title to its rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    version: String,
    source: String,
    defaults: PlanDefaults,
    entries: [RateEntry; 7],
}

impl RateTable {
    /// The table embedded in the crate.
    pub fn canonical() -> RevShareResult<Self> {
        Self::from_toml_str(CANONICAL_TABLE)
    }

    /// Read a rate table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RevShareResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            RevShareError::RateTable(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a rate table document. Every title must appear
    /// exactly once and no rate may be negative.
    pub fn from_toml_str(contents: &str) -> RevShareResult<Self> {
        let file: RateTableFile = toml::from_str(contents)?;

        let mut slots: [Option<RateEntry>; 7] = Default::default();
        for (code, entry) in file.titles {
            let title: Title = code
                .parse()
                .map_err(|_| RevShareError::RateTable(format!("unknown title code '{code}'")))?;
            entry.validate(title.code())?;
            let slot = &mut slots[title.index()];
            if slot.is_some() {
                return Err(RevShareError::RateTable(format!(
                    "title {} listed more than once",
                    title.code()
                )));
            }
            *slot = Some(entry);
        }

        let missing: Vec<&str> = Title::ALL
            .iter()
            .filter(|t| slots[t.index()].is_none())
            .map(|t| t.code())
            .collect();
        if !missing.is_empty() {
            return Err(RevShareError::RateTable(format!(
                "missing titles: {}",
                missing.join(", ")
            )));
        }

        file.defaults.validate()?;

        debug!(version = %file.version, source = %file.source, "loaded rate table");
        Ok(Self {
            version: file.version,
            source: file.source,
            defaults: file.defaults,
            entries: slots.map(Option::unwrap_or_default),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn defaults(&self) -> &PlanDefaults {
        &self.defaults
    }

    pub fn lookup(&self, title: Title) -> &RateEntry {
        &self.entries[title.index()]
    }

    /// Look up by label or code; fails with `UnknownTitle`.
    pub fn lookup_str(&self, title: &str) -> RevShareResult<&RateEntry> {
        let title: Title = title.parse()?;
        Ok(self.lookup(title))
    }

    /// All entries in hierarchy order.
    pub fn entries(&self) -> impl Iterator<Item = (Title, &RateEntry)> {
        Title::ALL.iter().copied().zip(self.entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_canonical_table_loads() {
        let table = RateTable::canonical().unwrap();
        assert_eq!(table.version(), "3");
        assert_eq!(table.entries().count(), 7);
        assert_eq!(table.defaults().commission_fraction, dec!(0.80));
    }

    #[test]
    fn test_dir3_rates() {
        let table = RateTable::canonical().unwrap();
        let dir3 = table.lookup(Title::Director3);
        assert_eq!(dir3.level_rates(Level::One), (dec!(0.001), dec!(0.0001)));
        assert_eq!(dir3.level_rates(Level::Three), (dec!(0.0007), dec!(0.0001)));
        assert!(dir3.has_profit_share);
        assert_eq!(dir3.profit_share_bonus, dec!(0.0001));
    }

    #[test]
    fn test_only_dir3_has_profit_share() {
        let table = RateTable::canonical().unwrap();
        for (title, entry) in table.entries() {
            assert_eq!(entry.has_profit_share, title == Title::Director3, "{title}");
        }
    }

    #[test]
    fn test_lookup_str_unknown() {
        let table = RateTable::canonical().unwrap();
        assert!(table.lookup_str("DIR2").is_ok());
        assert!(matches!(
            table.lookup_str("Regional Manager"),
            Err(RevShareError::UnknownTitle(_))
        ));
    }

    #[test]
    fn test_missing_title_rejected() {
        let doc = r#"
            version = "x"
            [titles.AMB]
            level1_bonus = "0.0005"
        "#;
        let err = RateTable::from_toml_str(doc).unwrap_err();
        assert!(err.to_string().contains("missing titles"), "{err}");
        assert!(err.to_string().contains("DIR3"), "{err}");
    }

    #[test]
    fn test_negative_rate_rejected() {
        let doc = CANONICAL_TABLE.replace(
            "[titles.AMB]\nlevel1_bonus = \"0.0005\"",
            "[titles.AMB]\nlevel1_bonus = \"-0.0005\"",
        );
        let err = RateTable::from_toml_str(&doc).unwrap_err();
        assert!(err.to_string().contains("AMB.level1_bonus"), "{err}");
    }

    #[test]
    fn test_unknown_default_key_rejected() {
        let doc = CANONICAL_TABLE.replace("[defaults]\n", "[defaults]\npool_rate = \"0.0002\"\n");
        let err = RateTable::from_toml_str(&doc).unwrap_err();
        assert!(err.to_string().contains("pool_rate"), "{err}");
    }

    #[test]
    fn test_unknown_code_rejected() {
        let doc = format!("{CANONICAL_TABLE}\n[titles.CEO]\nlevel1_bonus = \"0.01\"\n");
        let err = RateTable::from_toml_str(&doc).unwrap_err();
        assert!(err.to_string().contains("CEO"), "{err}");
    }

    #[test]
    fn test_missing_rates_default_to_zero() {
        let table =
            RateTable::from_toml_str(include_str!("../../data/rate_table_v1.toml")).unwrap();
        let amb = table.lookup(Title::Ambassador);
        assert_eq!(amb.level1_bonus, dec!(0.0008));
        assert_eq!(amb.level1_gen_bonus, Decimal::ZERO);
        assert_eq!(table.defaults().commission_fraction, dec!(0.20));
        // Unlisted defaults fall back to the plan constants
        assert_eq!(table.defaults().avg_loan_size, dec!(445000));
    }
}
