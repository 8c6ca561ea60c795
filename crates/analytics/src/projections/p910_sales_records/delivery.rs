use chrono::NaiveDateTime;
use contracts::enums::DeliveryCategory;
use contracts::projections::p910_sales_records::{DeliveredRecord, SalesRecord};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days from purchase to delivery, floored toward negative infinity.
pub fn delivery_days(purchase: NaiveDateTime, delivered: Option<NaiveDateTime>) -> Option<i64> {
    delivered.map(|d| (d - purchase).num_seconds().div_euclid(SECONDS_PER_DAY))
}

/// Keep delivered orders only and attach delivery latency.
///
/// Negative latencies are kept as-is and reported.
pub fn filter_delivered(records: &[SalesRecord]) -> Vec<DeliveredRecord> {
    let mut negative = 0usize;

    let delivered: Vec<DeliveredRecord> = records
        .iter()
        .filter(|r| r.is_delivered())
        .map(|r| {
            let days = delivery_days(r.order_purchase_timestamp, r.order_delivered_customer_date);
            if days.map_or(false, |d| d < 0) {
                negative += 1;
            }
            DeliveredRecord {
                sale: r.clone(),
                delivery_days: days,
                delivery_category: DeliveryCategory::from_days(days),
            }
        })
        .collect();

    if negative > 0 {
        tracing::warn!(
            "{} delivered records have a delivery date before the purchase date",
            negative
        );
    }
    tracing::info!(
        "Filtered to {} delivered records from {} total records",
        delivered.len(),
        records.len()
    );

    delivered
}
