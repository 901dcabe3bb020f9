pub mod level;
pub mod plan;
pub mod table;
pub mod title;

pub use level::Level;
pub use plan::{CapPolicy, PlanDefaults};
pub use table::{RateEntry, RateTable};
pub use title::Title;
