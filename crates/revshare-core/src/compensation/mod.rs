pub mod amortization;
pub mod comparator;
pub mod formula;

pub use crate::rate_table::CapPolicy;
