//! Test builders shared by the pipeline and dashboard tests.

use chrono::{Datelike, Duration, NaiveDateTime};
use contracts::enums::DeliveryCategory;
use contracts::projections::p910_sales_records::{DeliveredRecord, SalesRecord};

use super::projection_builder::parse_timestamp;
use crate::usecases::u510_load_ecommerce_csv::{LoadedTables, RawTable, TableName};

pub const ORDERS_HEADER: &str =
    "order_id,order_status,order_purchase_timestamp,order_delivered_customer_date,customer_id";
pub const ITEMS_HEADER: &str = "order_id,order_item_id,product_id,price";
pub const PRODUCTS_HEADER: &str = "product_id,product_category_name";
pub const CUSTOMERS_HEADER: &str = "customer_id,customer_state,customer_city";
pub const REVIEWS_HEADER: &str = "order_id,review_score";

/// Builds `LoadedTables` from inline CSV rows
pub struct Fixture {
    tables: LoadedTables,
}

impl Fixture {
    pub fn new(orders: &[&str], items: &[&str]) -> Self {
        let mut tables = LoadedTables::new();
        tables.insert(table(TableName::Orders, ORDERS_HEADER, orders));
        tables.insert(table(TableName::OrderItems, ITEMS_HEADER, items));
        Self { tables }
    }

    pub fn products(mut self, rows: &[&str]) -> Self {
        self.tables
            .insert(table(TableName::Products, PRODUCTS_HEADER, rows));
        self
    }

    pub fn customers(mut self, rows: &[&str]) -> Self {
        self.tables
            .insert(table(TableName::Customers, CUSTOMERS_HEADER, rows));
        self
    }

    pub fn reviews(mut self, rows: &[&str]) -> Self {
        self.tables
            .insert(table(TableName::Reviews, REVIEWS_HEADER, rows));
        self
    }

    pub fn build(self) -> LoadedTables {
        self.tables
    }
}

pub fn table(name: TableName, header: &str, rows: &[&str]) -> RawTable {
    let mut text = String::from(header);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    RawTable::from_reader(name, text.as_bytes()).unwrap()
}

pub fn ts(value: &str) -> NaiveDateTime {
    parse_timestamp(value).unwrap()
}

/// A delivered line item with every optional column filled
pub fn sale(order_id: &str, order_item_id: u32, price: f64, purchased: &str) -> SalesRecord {
    let purchase = ts(purchased);
    SalesRecord {
        order_id: order_id.to_string(),
        order_item_id,
        product_id: format!("p-{}-{}", order_id, order_item_id),
        price,
        order_status: "delivered".to_string(),
        order_purchase_timestamp: purchase,
        order_delivered_customer_date: None,
        customer_id: format!("c-{}", order_id),
        year: purchase.year(),
        month: purchase.month(),
        quarter: (purchase.month() - 1) / 3 + 1,
        product_category_name: Some("misc".to_string()),
        customer_state: Some("SP".to_string()),
        customer_city: Some("sao paulo".to_string()),
        review_score: None,
    }
}

/// Wrap a sale as delivered `days` days after purchase
pub fn delivered(mut sale: SalesRecord, days: Option<i64>) -> DeliveredRecord {
    let purchase = sale.order_purchase_timestamp;
    sale.order_delivered_customer_date = days.map(|d| purchase + Duration::days(d));
    DeliveredRecord {
        sale,
        delivery_days: days,
        delivery_category: DeliveryCategory::from_days(days),
    }
}
