use chrono::{Datelike, NaiveDate, NaiveDateTime};
use contracts::projections::p910_sales_records::{AvailableColumns, SalesRecord};
use std::collections::HashMap;

use crate::shared::error::PipelineError;
use crate::usecases::u510_load_ecommerce_csv::{LoadedTables, RawTable, TableName};

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Unified order lines plus the optional columns that could be joined
#[derive(Debug, Clone)]
pub struct UnifiedSales {
    pub records: Vec<SalesRecord>,
    pub columns: AvailableColumns,
}

/// Rows excluded while joining, by reason
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DroppedRows {
    pub unmatched_order: usize,
    pub bad_purchase_timestamp: usize,
    pub bad_delivered_date: usize,
    pub bad_item_id: usize,
    pub bad_price: usize,
}

impl DroppedRows {
    pub fn total(&self) -> usize {
        self.unmatched_order
            + self.bad_purchase_timestamp
            + self.bad_delivered_date
            + self.bad_item_id
            + self.bad_price
    }
}

enum DeliveredDate {
    Missing,
    Parsed(NaiveDateTime),
    Invalid,
}

struct OrderInfo<'a> {
    status: &'a str,
    purchase: Option<NaiveDateTime>,
    delivered: DeliveredDate,
    customer_id: &'a str,
}

struct CustomerLocation<'a> {
    state: Option<&'a str>,
    city: Option<&'a str>,
}

/// Parse a source timestamp. Date-only values are taken at midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_price(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

/// Review scores are integers 1..=5, sometimes written as "4.0"
fn parse_review_score(value: &str) -> Option<u8> {
    value
        .parse::<f64>()
        .ok()
        .filter(|s| s.fract() == 0.0 && (1.0..=5.0).contains(s))
        .map(|s| s as u8)
}

fn required_column(
    table: &RawTable,
    table_key: &'static str,
    column: &'static str,
) -> Result<usize, PipelineError> {
    table
        .column_index(column)
        .ok_or(PipelineError::MissingColumn {
            table: table_key,
            column,
        })
}

fn index_orders<'a>(
    orders: &'a RawTable,
    columns: &mut AvailableColumns,
) -> Result<HashMap<&'a str, OrderInfo<'a>>, PipelineError> {
    let order_id = required_column(orders, "orders", "order_id")?;
    let status = required_column(orders, "orders", "order_status")?;
    let purchase = required_column(orders, "orders", "order_purchase_timestamp")?;
    let customer = required_column(orders, "orders", "customer_id")?;
    let delivered = orders.column_index("order_delivered_customer_date");
    if delivered.is_none() {
        tracing::warn!("orders has no order_delivered_customer_date column, delivery analysis unavailable");
        columns.delivered_date = false;
    }

    let mut index = HashMap::with_capacity(orders.row_count());
    let mut duplicates = 0usize;

    for row in orders.rows() {
        let Some(id) = RawTable::field(row, Some(order_id)) else {
            continue;
        };
        if index.contains_key(id) {
            duplicates += 1;
            continue;
        }

        let delivered = match RawTable::field(row, delivered) {
            None => DeliveredDate::Missing,
            Some(v) => match parse_timestamp(v) {
                Some(ts) => DeliveredDate::Parsed(ts),
                None => DeliveredDate::Invalid,
            },
        };

        index.insert(
            id,
            OrderInfo {
                status: RawTable::field(row, Some(status)).unwrap_or_default(),
                purchase: RawTable::field(row, Some(purchase)).and_then(parse_timestamp),
                delivered,
                customer_id: RawTable::field(row, Some(customer)).unwrap_or_default(),
            },
        );
    }

    if duplicates > 0 {
        tracing::warn!("orders: {} duplicate order_id rows ignored", duplicates);
    }

    Ok(index)
}

fn index_products<'a>(
    products: Option<&'a RawTable>,
    columns: &mut AvailableColumns,
) -> HashMap<&'a str, Option<&'a str>> {
    let mut index = HashMap::new();
    let Some(products) = products else {
        columns.product_category = false;
        return index;
    };
    let (Some(id), Some(category)) = (
        products.column_index("product_id"),
        products.column_index("product_category_name"),
    ) else {
        tracing::warn!("products lacks product_id/product_category_name, category analysis unavailable");
        columns.product_category = false;
        return index;
    };

    for row in products.rows() {
        if let Some(key) = RawTable::field(row, Some(id)) {
            index
                .entry(key)
                .or_insert_with(|| RawTable::field(row, Some(category)));
        }
    }
    index
}

fn index_customers<'a>(
    customers: Option<&'a RawTable>,
    columns: &mut AvailableColumns,
) -> HashMap<&'a str, CustomerLocation<'a>> {
    let mut index = HashMap::new();
    let Some(customers) = customers else {
        columns.customer_location = false;
        return index;
    };
    let (Some(id), Some(state)) = (
        customers.column_index("customer_id"),
        customers.column_index("customer_state"),
    ) else {
        tracing::warn!("customers lacks customer_id/customer_state, geographic analysis unavailable");
        columns.customer_location = false;
        return index;
    };
    let city = customers.column_index("customer_city");

    for row in customers.rows() {
        if let Some(key) = RawTable::field(row, Some(id)) {
            index.entry(key).or_insert_with(|| CustomerLocation {
                state: RawTable::field(row, Some(state)),
                city: RawTable::field(row, city),
            });
        }
    }
    index
}

/// Every review of an order, in source order. Not deduplicated.
fn index_reviews<'a>(
    reviews: Option<&'a RawTable>,
    columns: &mut AvailableColumns,
) -> HashMap<&'a str, Vec<Option<u8>>> {
    let mut index: HashMap<&str, Vec<Option<u8>>> = HashMap::new();
    let Some(reviews) = reviews else {
        columns.review_score = false;
        return index;
    };
    let (Some(id), Some(score)) = (
        reviews.column_index("order_id"),
        reviews.column_index("review_score"),
    ) else {
        tracing::warn!("reviews lacks order_id/review_score, satisfaction analysis unavailable");
        columns.review_score = false;
        return index;
    };

    for row in reviews.rows() {
        if let Some(key) = RawTable::field(row, Some(id)) {
            index
                .entry(key)
                .or_default()
                .push(RawTable::field(row, Some(score)).and_then(parse_review_score));
        }
    }
    index
}

/// Join order items with their orders (inner) and with product category,
/// customer location and review score (left). Rows keep the order of
/// `order_items`; an order with several reviews yields one row per review.
pub fn unify(tables: &LoadedTables) -> Result<UnifiedSales, PipelineError> {
    let orders = tables
        .get(TableName::Orders)
        .ok_or(PipelineError::MissingTable("orders"))?;
    let items = tables
        .get(TableName::OrderItems)
        .ok_or(PipelineError::MissingTable("order_items"))?;

    let item_order_id = required_column(items, "order_items", "order_id")?;
    let item_id = required_column(items, "order_items", "order_item_id")?;
    let item_product = required_column(items, "order_items", "product_id")?;
    let item_price = required_column(items, "order_items", "price")?;

    let mut columns = AvailableColumns::all();
    let order_index = index_orders(orders, &mut columns)?;
    let products = index_products(tables.get(TableName::Products), &mut columns);
    let customers = index_customers(tables.get(TableName::Customers), &mut columns);
    let reviews = index_reviews(tables.get(TableName::Reviews), &mut columns);

    let mut records = Vec::with_capacity(items.row_count());
    let mut dropped = DroppedRows::default();

    for row in items.rows() {
        let Some(order_id) = RawTable::field(row, Some(item_order_id)) else {
            dropped.unmatched_order += 1;
            continue;
        };
        let Some(order) = order_index.get(order_id) else {
            dropped.unmatched_order += 1;
            continue;
        };
        let Some(purchase) = order.purchase else {
            dropped.bad_purchase_timestamp += 1;
            continue;
        };
        let delivered = match order.delivered {
            DeliveredDate::Missing => None,
            DeliveredDate::Parsed(ts) => Some(ts),
            DeliveredDate::Invalid => {
                dropped.bad_delivered_date += 1;
                continue;
            }
        };
        let Some(order_item_id) =
            RawTable::field(row, Some(item_id)).and_then(|v| v.parse::<u32>().ok())
        else {
            dropped.bad_item_id += 1;
            continue;
        };
        let Some(price) = RawTable::field(row, Some(item_price)).and_then(parse_price) else {
            dropped.bad_price += 1;
            continue;
        };

        let product_id = RawTable::field(row, Some(item_product)).unwrap_or_default();
        let location = customers.get(order.customer_id);
        let month = purchase.month();

        let record = SalesRecord {
            order_id: order_id.to_string(),
            order_item_id,
            product_id: product_id.to_string(),
            price,
            order_status: order.status.to_string(),
            order_purchase_timestamp: purchase,
            order_delivered_customer_date: delivered,
            customer_id: order.customer_id.to_string(),
            year: purchase.year(),
            month,
            quarter: (month - 1) / 3 + 1,
            product_category_name: products
                .get(product_id)
                .copied()
                .flatten()
                .map(str::to_string),
            customer_state: location.and_then(|l| l.state).map(str::to_string),
            customer_city: location.and_then(|l| l.city).map(str::to_string),
            review_score: None,
        };

        match reviews.get(order_id) {
            Some(scores) => {
                for score in scores {
                    records.push(SalesRecord {
                        review_score: *score,
                        ..record.clone()
                    });
                }
            }
            None => records.push(record),
        }
    }

    if dropped.total() > 0 {
        tracing::warn!(
            "Dropped {} order item rows: unmatched_order={} bad_purchase_timestamp={} bad_delivered_date={} bad_item_id={} bad_price={}",
            dropped.total(),
            dropped.unmatched_order,
            dropped.bad_purchase_timestamp,
            dropped.bad_delivered_date,
            dropped.bad_item_id,
            dropped.bad_price
        );
    }
    tracing::info!(
        "Unified {} sales records from {} order items",
        records.len(),
        items.row_count()
    );

    Ok(UnifiedSales { records, columns })
}
