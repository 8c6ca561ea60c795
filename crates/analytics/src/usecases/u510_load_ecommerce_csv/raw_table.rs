use std::collections::BTreeMap;
use std::io::Read;

/// Logical names of the six sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableName {
    Orders,
    OrderItems,
    Products,
    Customers,
    Reviews,
    Payments,
}

impl TableName {
    pub fn key(&self) -> &'static str {
        match self {
            TableName::Orders => "orders",
            TableName::OrderItems => "order_items",
            TableName::Products => "products",
            TableName::Customers => "customers",
            TableName::Reviews => "reviews",
            TableName::Payments => "payments",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            TableName::Orders => "orders_dataset.csv",
            TableName::OrderItems => "order_items_dataset.csv",
            TableName::Products => "products_dataset.csv",
            TableName::Customers => "customers_dataset.csv",
            TableName::Reviews => "order_reviews_dataset.csv",
            TableName::Payments => "order_payments_dataset.csv",
        }
    }

    pub fn all() -> Vec<TableName> {
        vec![
            TableName::Orders,
            TableName::OrderItems,
            TableName::Products,
            TableName::Customers,
            TableName::Reviews,
            TableName::Payments,
        ]
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A CSV source held as text rows plus its header.
///
/// Columns are looked up by header name; nothing is validated here.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub name: TableName,
    headers: Vec<String>,
    rows: Vec<csv::StringRecord>,
}

impl RawTable {
    pub fn from_reader<R: Read>(name: TableName, reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            // Strip UTF-8 BOM if present
            .map(|h| h.trim_start_matches('\u{FEFF}').trim().to_string())
            .collect();

        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            headers,
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = &csv::StringRecord> {
        self.rows.iter()
    }

    /// Trimmed field at `index`, `None` when absent or blank
    pub fn field(row: &csv::StringRecord, index: Option<usize>) -> Option<&str> {
        index
            .and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Result of a load run: the tables that were found and the ones that were not
#[derive(Debug, Clone, Default)]
pub struct LoadedTables {
    tables: BTreeMap<TableName, RawTable>,
    missing: Vec<TableName>,
}

impl LoadedTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: RawTable) {
        self.missing.retain(|name| *name != table.name);
        self.tables.insert(table.name, table);
    }

    pub fn mark_missing(&mut self, name: TableName) {
        if !self.tables.contains_key(&name) && !self.missing.contains(&name) {
            self.missing.push(name);
        }
    }

    pub fn get(&self, name: TableName) -> Option<&RawTable> {
        self.tables.get(&name)
    }

    pub fn missing(&self) -> &[TableName] {
        &self.missing
    }

    pub fn loaded(&self) -> impl Iterator<Item = TableName> + '_ {
        self.tables.keys().copied()
    }
}
