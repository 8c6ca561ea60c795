pub mod executor;
pub mod raw_table;

pub use executor::load_raw_datasets;
pub use raw_table::{LoadedTables, RawTable, TableName};
