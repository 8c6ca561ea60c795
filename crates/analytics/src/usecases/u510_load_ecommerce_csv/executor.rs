use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use super::raw_table::{LoadedTables, RawTable, TableName};
use crate::shared::error::LoadError;

/// Load every known source found under `base`.
///
/// A missing file is logged and skipped. Any other I/O or CSV failure
/// aborts the load.
pub fn load_raw_datasets(base: &Path) -> Result<LoadedTables, LoadError> {
    let mut tables = LoadedTables::new();

    for name in TableName::all() {
        let path = base.join(name.file_name());

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("{} not found in {}", name.file_name(), base.display());
                tables.mark_missing(name);
                continue;
            }
            Err(source) => return Err(LoadError::Io { path, source }),
        };

        let table = RawTable::from_reader(name, BufReader::new(file))
            .map_err(|source| LoadError::Csv {
                path: path.clone(),
                source,
            })?;

        tracing::info!(
            "Loaded {}: {} rows, {} columns",
            name,
            table.row_count(),
            table.column_count()
        );
        tables.insert(table);
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_load_reports_missing_sources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("orders_dataset.csv"),
            "order_id,order_status\no1,delivered\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("order_items_dataset.csv"),
            "order_id,order_item_id,product_id,price\no1,1,p1,10.0\n",
        )
        .unwrap();

        let tables = load_raw_datasets(dir.path()).unwrap();

        assert_eq!(tables.get(TableName::Orders).unwrap().row_count(), 1);
        assert_eq!(tables.get(TableName::OrderItems).unwrap().column_count(), 4);
        assert_eq!(
            tables.missing(),
            &[
                TableName::Products,
                TableName::Customers,
                TableName::Reviews,
                TableName::Payments
            ]
        );
    }

    #[test]
    fn test_empty_directory_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let tables = load_raw_datasets(dir.path()).unwrap();
        assert_eq!(tables.missing().len(), 6);
        assert_eq!(tables.loaded().count(), 0);
    }

    #[test]
    fn test_unreadable_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where a file is expected cannot be parsed as CSV
        std::fs::create_dir(dir.path().join("orders_dataset.csv")).unwrap();
        assert!(load_raw_datasets(dir.path()).is_err());
    }
}
