use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::enums::DeliveryCategory;

/// Order status that makes a record eligible for delivery analysis.
pub const DELIVERED_STATUS: &str = "delivered";

/// One order line joined with its order, product, customer and review.
///
/// Order-level fields repeat across every line of the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub order_id: String,
    pub order_item_id: u32,
    pub product_id: String,
    pub price: f64,
    pub order_status: String,
    pub order_purchase_timestamp: NaiveDateTime,
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    pub customer_id: String,

    // Derived from the purchase timestamp
    pub year: i32,
    pub month: u32,
    pub quarter: u32,

    // Left-joined, null when unmatched
    pub product_category_name: Option<String>,
    pub customer_state: Option<String>,
    pub customer_city: Option<String>,
    pub review_score: Option<u8>,
}

impl SalesRecord {
    pub fn is_delivered(&self) -> bool {
        self.order_status == DELIVERED_STATUS
    }
}

impl AsRef<SalesRecord> for SalesRecord {
    fn as_ref(&self) -> &SalesRecord {
        self
    }
}

/// A delivered sales record with its delivery latency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveredRecord {
    #[serde(flatten)]
    pub sale: SalesRecord,
    /// Whole days between purchase and delivery, floored. May be negative
    /// for inconsistent source data.
    pub delivery_days: Option<i64>,
    pub delivery_category: DeliveryCategory,
}

impl AsRef<SalesRecord> for DeliveredRecord {
    fn as_ref(&self) -> &SalesRecord {
        &self.sale
    }
}

/// Which optional columns survived loading. An analyzer whose column is
/// missing reports itself unavailable instead of computing on nulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableColumns {
    pub product_category: bool,
    pub customer_location: bool,
    pub review_score: bool,
    pub delivered_date: bool,
}

impl AvailableColumns {
    pub fn all() -> Self {
        Self {
            product_category: true,
            customer_location: true,
            review_score: true,
            delivered_date: true,
        }
    }
}

impl Default for AvailableColumns {
    fn default() -> Self {
        Self::all()
    }
}
