pub mod compensation;
pub mod rates;
pub mod report;
pub mod revenue_share;
pub mod team;
