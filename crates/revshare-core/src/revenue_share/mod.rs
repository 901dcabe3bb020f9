pub mod level;
pub mod profit_sharing;
pub mod summary;
