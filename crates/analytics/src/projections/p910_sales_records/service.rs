use contracts::projections::p910_sales_records::{AvailableColumns, DeliveredRecord, SalesRecord};
use std::path::Path;

use super::delivery::filter_delivered;
use super::projection_builder::unify;
use crate::shared::error::PipelineError;
use crate::usecases::u510_load_ecommerce_csv::{load_raw_datasets, LoadedTables};

/// Output of load-and-clean, shared read-only between report queries
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    /// Every unified record regardless of status
    pub sales: Vec<SalesRecord>,
    pub delivered: Vec<DeliveredRecord>,
    pub columns: AvailableColumns,
}

impl PreparedDataset {
    /// Calendar years present among delivered records, newest first
    pub fn available_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.delivered.iter().map(|r| r.sale.year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }
}

pub fn prepare(tables: &LoadedTables) -> Result<PreparedDataset, PipelineError> {
    let unified = unify(tables)?;
    let delivered = filter_delivered(&unified.records);
    Ok(PreparedDataset {
        sales: unified.records,
        delivered,
        columns: unified.columns,
    })
}

pub fn load_and_prepare(base: &Path) -> Result<PreparedDataset, PipelineError> {
    let tables = load_raw_datasets(base)?;
    prepare(&tables)
}
