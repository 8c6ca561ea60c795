use contracts::dashboards::d402_ecommerce_kpi::{
    BucketCount, BucketScore, DeliveryPerformance, GroupResult,
};
use contracts::enums::{DeliveryCategory, DeliveryTimeBucket};
use contracts::projections::p910_sales_records::{AvailableColumns, DeliveredRecord};
use std::collections::{BTreeMap, HashMap};

use super::metrics::{mean, median, percentage};

const ON_TIME_DAYS: i64 = 7;

/// Delivery facts of one order
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderDelivery {
    days: Option<i64>,
    category: DeliveryCategory,
    score: Option<u8>,
}

/// Collapse line items to orders, in order of first appearance. Delivery
/// fields are order-level; the score is the first non-null one.
fn per_order(records: &[DeliveredRecord]) -> Vec<OrderDelivery> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut orders: Vec<OrderDelivery> = Vec::new();

    for r in records {
        match index.get(r.sale.order_id.as_str()) {
            Some(&i) => {
                if orders[i].score.is_none() {
                    orders[i].score = r.sale.review_score;
                }
            }
            None => {
                index.insert(r.sale.order_id.as_str(), orders.len());
                orders.push(OrderDelivery {
                    days: r.delivery_days,
                    category: r.delivery_category,
                    score: r.sale.review_score,
                });
            }
        }
    }
    orders
}

fn delivery_day_values(orders: &[OrderDelivery]) -> Vec<f64> {
    orders
        .iter()
        .filter_map(|o| o.days)
        .map(|d| d as f64)
        .collect()
}

/// Mean delivery days over orders with a delivery date
pub fn average_delivery_days(records: &[DeliveredRecord]) -> Option<f64> {
    mean(&delivery_day_values(&per_order(records)))
}

fn scores_by_bucket<B, F>(orders: &[&OrderDelivery], bucket: F) -> Vec<BucketScore<B>>
where
    B: Ord + Copy,
    F: Fn(&OrderDelivery) -> B,
{
    let mut groups: BTreeMap<B, (f64, usize)> = BTreeMap::new();
    for order in orders {
        if let Some(score) = order.score {
            let entry = groups.entry(bucket(*order)).or_insert((0.0, 0));
            entry.0 += f64::from(score);
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(bucket, (sum, count))| BucketScore {
            bucket,
            average_review_score: sum / count as f64,
            orders: count,
        })
        .collect()
}

/// Delivery latency statistics over delivered orders with a delivery date
pub fn delivery_performance(
    records: &[DeliveredRecord],
    columns: &AvailableColumns,
) -> GroupResult<DeliveryPerformance> {
    if !columns.delivered_date {
        return GroupResult::unavailable("Delivery information not available");
    }

    let orders = per_order(records);
    let timed: Vec<&OrderDelivery> = orders.iter().filter(|o| o.days.is_some()).collect();
    if timed.is_empty() {
        return GroupResult::Empty;
    }

    let days: Vec<f64> = timed.iter().filter_map(|o| o.days).map(|d| d as f64).collect();
    let on_time = timed
        .iter()
        .filter(|o| o.days.map_or(false, |d| d <= ON_TIME_DAYS))
        .count();

    let mut counts: BTreeMap<DeliveryCategory, usize> = BTreeMap::new();
    for order in &timed {
        *counts.entry(order.category).or_insert(0) += 1;
    }

    let (by_speed, by_time) = if columns.review_score {
        (
            Some(scores_by_bucket(&timed, |o| o.category)),
            Some(scores_by_bucket(&timed, |o| DeliveryTimeBucket::from_days(o.days))),
        )
    } else {
        (None, None)
    };

    GroupResult::Computed(DeliveryPerformance {
        average_delivery_days: mean(&days).unwrap_or(0.0),
        median_delivery_days: median(&days).unwrap_or(0.0),
        delivery_categories: counts
            .into_iter()
            .map(|(bucket, orders)| BucketCount { bucket, orders })
            .collect(),
        on_time_percentage: percentage(on_time as f64, timed.len() as f64),
        satisfaction_by_delivery_speed: by_speed,
        satisfaction_by_delivery_time: by_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::p910_sales_records::fixtures::{delivered, sale};

    fn order(order_id: &str, items: u32, days: Option<i64>, score: Option<u8>) -> Vec<DeliveredRecord> {
        (1..=items)
            .map(|item| {
                let mut record = sale(order_id, item, 10.0, "2023-01-01 00:00:00");
                record.review_score = score;
                delivered(record, days)
            })
            .collect()
    }

    #[test]
    fn test_statistics_are_per_order() {
        let mut records = order("a", 2, Some(2), Some(5));
        records.extend(order("b", 1, Some(10), Some(3)));

        let result = delivery_performance(&records, &AvailableColumns::all());
        let performance = result.computed().unwrap();
        assert_eq!(performance.average_delivery_days, 6.0);
        assert_eq!(performance.median_delivery_days, 6.0);
        assert_eq!(performance.on_time_percentage, 50.0);
        assert_eq!(
            performance.delivery_categories,
            vec![
                BucketCount { bucket: DeliveryCategory::UpTo3Days, orders: 1 },
                BucketCount { bucket: DeliveryCategory::Over7Days, orders: 1 },
            ]
        );
    }

    #[test]
    fn test_missing_delivery_dates_are_ignored() {
        let mut records = order("a", 1, Some(4), None);
        records.extend(order("b", 1, None, None));
        let result = delivery_performance(&records, &AvailableColumns::all());
        let performance = result.computed().unwrap();
        assert_eq!(performance.average_delivery_days, 4.0);
        assert_eq!(performance.on_time_percentage, 100.0);
        assert_eq!(performance.delivery_categories.len(), 1);

        let undated = order("c", 1, None, Some(5));
        assert!(delivery_performance(&undated, &AvailableColumns::all()).is_empty());
    }

    #[test]
    fn test_two_bucket_schemes_for_satisfaction() {
        let mut records = order("a", 1, Some(9), Some(2));
        records.extend(order("b", 1, Some(20), Some(4)));
        records.extend(order("c", 1, Some(1), Some(5)));
        records.extend(order("d", 1, Some(6), None));

        let result = delivery_performance(&records, &AvailableColumns::all());
        let performance = result.computed().unwrap();

        let by_speed = performance.satisfaction_by_delivery_speed.as_ref().unwrap();
        assert_eq!(
            by_speed
                .iter()
                .map(|b| (b.bucket, b.average_review_score, b.orders))
                .collect::<Vec<_>>(),
            vec![
                (DeliveryCategory::UpTo3Days, 5.0, 1),
                (DeliveryCategory::Over7Days, 3.0, 2),
            ]
        );

        let by_time = performance.satisfaction_by_delivery_time.as_ref().unwrap();
        assert_eq!(
            by_time
                .iter()
                .map(|b| (b.bucket, b.average_review_score))
                .collect::<Vec<_>>(),
            vec![
                (DeliveryTimeBucket::UpTo3Days, 5.0),
                (DeliveryTimeBucket::From8To14Days, 2.0),
                (DeliveryTimeBucket::Over14Days, 4.0),
            ]
        );
    }

    #[test]
    fn test_without_reviews_or_delivery_column() {
        let records = order("a", 1, Some(3), Some(5));
        let no_reviews = AvailableColumns {
            review_score: false,
            ..AvailableColumns::all()
        };
        let result = delivery_performance(&records, &no_reviews);
        assert_eq!(result.computed().unwrap().satisfaction_by_delivery_speed, None);

        let no_delivery = AvailableColumns {
            delivered_date: false,
            ..AvailableColumns::all()
        };
        assert!(delivery_performance(&records, &no_delivery).is_unavailable());
    }

    #[test]
    fn test_average_delivery_days() {
        let mut records = order("a", 3, Some(1), None);
        records.extend(order("b", 1, Some(4), None));
        assert_eq!(average_delivery_days(&records), Some(2.5));
        assert_eq!(average_delivery_days(&[]), None);
    }
}
