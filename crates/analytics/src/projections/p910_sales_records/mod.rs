pub mod delivery;
pub mod projection_builder;
pub mod service;

#[cfg(test)]
pub(crate) mod fixtures;

pub use delivery::filter_delivered;
pub use projection_builder::{unify, UnifiedSales};
pub use service::{load_and_prepare, prepare, PreparedDataset};
