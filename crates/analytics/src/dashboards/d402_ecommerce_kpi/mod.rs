pub mod breakdown;
pub mod cache;
pub mod delivery;
pub mod metrics;
pub mod period;
pub mod satisfaction;
pub mod service;
pub mod status;

pub use cache::{load_prepared, PreparedCache, PREPARED_CACHE};
pub use period::{filter_by_date_range, filter_period, select_periods, PeriodSplit};
pub use service::{assemble_report, build_report, generate_report};
