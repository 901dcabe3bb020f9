use thiserror::Error;

#[derive(Debug, Error)]
pub enum RevShareError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown title: {0}")]
    UnknownTitle(String),

    #[error("Invalid level: {0} (expected 1, 2 or 3)")]
    InvalidLevel(i64),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Import row {row}: {reason}")]
    ImportRow { row: usize, reason: String },

    #[error("Import format error: {0}")]
    ImportFormat(String),

    #[error("Duplicate team member: {0}")]
    DuplicateMember(String),

    #[error("Rate table error: {0}")]
    RateTable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RevShareError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RevShareError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RevShareError {
    fn from(e: serde_json::Error) -> Self {
        RevShareError::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for RevShareError {
    fn from(e: toml::de::Error) -> Self {
        RevShareError::RateTable(e.to_string())
    }
}
