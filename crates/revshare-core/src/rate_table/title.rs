use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RevShareError;

/// Paid-as title in the sales hierarchy, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Title {
    Ambassador,
    ActiveAmbassador,
    Ambassador2,
    Ambassador3,
    Director1,
    Director2,
    Director3,
}

impl Title {
    pub const ALL: [Title; 7] = [
        Title::Ambassador,
        Title::ActiveAmbassador,
        Title::Ambassador2,
        Title::Ambassador3,
        Title::Director1,
        Title::Director2,
        Title::Director3,
    ];

    /// Short code used in rate table files, e.g. `DIR3`.
    pub fn code(self) -> &'static str {
        match self {
            Title::Ambassador => "AMB",
            Title::ActiveAmbassador => "AAMB",
            Title::Ambassador2 => "AMB2",
            Title::Ambassador3 => "AMB3",
            Title::Director1 => "DIR1",
            Title::Director2 => "DIR2",
            Title::Director3 => "DIR3",
        }
    }

    /// Display label, e.g. `Director 3 (DIR3)`.
    pub fn label(self) -> &'static str {
        match self {
            Title::Ambassador => "Ambassador (AMB)",
            Title::ActiveAmbassador => "Active Ambassador (AAMB)",
            Title::Ambassador2 => "Ambassador 2 (AMB2)",
            Title::Ambassador3 => "Ambassador 3 (AMB3)",
            Title::Director1 => "Director 1 (DIR1)",
            Title::Director2 => "Director 2 (DIR2)",
            Title::Director3 => "Director 3 (DIR3)",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Title {
    type Err = RevShareError;

    /// Accepts either the display label or the code (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Title::ALL
            .iter()
            .copied()
            .find(|t| t.label() == trimmed || t.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RevShareError::UnknownTitle(s.to_string()))
    }
}

impl TryFrom<String> for Title {
    type Error = RevShareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Title> for String {
    fn from(t: Title) -> Self {
        t.label().to_string()
    }
}
