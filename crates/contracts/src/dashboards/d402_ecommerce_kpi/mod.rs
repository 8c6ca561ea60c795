pub mod dto;
pub mod period;

pub use dto::*;
pub use period::{DateRange, PeriodSelector};
