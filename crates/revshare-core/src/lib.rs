pub mod error;
pub mod format;
pub mod rate_table;
pub mod types;

#[cfg(feature = "revenue_share")]
pub mod revenue_share;

#[cfg(feature = "compensation")]
pub mod compensation;

#[cfg(feature = "team")]
pub mod team;

#[cfg(feature = "report")]
pub mod report;

pub use error::RevShareError;
pub use rate_table::{Level, RateEntry, RateTable, Title};
pub use types::*;

/// Standard result type for all revshare operations
pub type RevShareResult<T> = Result<T, RevShareError>;
