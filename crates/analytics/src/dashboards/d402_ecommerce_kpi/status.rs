use contracts::dashboards::d402_ecommerce_kpi::{
    DataSummary, DateSpan, GroupResult, OrderStatusMetrics, StatusRow,
};
use contracts::projections::p910_sales_records::{AvailableColumns, SalesRecord, DELIVERED_STATUS};
use std::collections::{BTreeMap, HashSet};

use super::metrics::{distinct_customers, distinct_orders, percentage, total_revenue};

/// Distinct orders per status, each order counted under its first status
fn orders_per_status<R: AsRef<SalesRecord>>(records: &[R]) -> BTreeMap<String, usize> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for r in records {
        let sale = r.as_ref();
        if seen.insert(sale.order_id.as_str()) {
            *counts.entry(sale.order_status.clone()).or_insert(0) += 1;
        }
    }
    counts
}

fn rows_per_status<R: AsRef<SalesRecord>>(records: &[R]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.as_ref().order_status.clone()).or_insert(0) += 1;
    }
    counts
}

/// Status mix of all orders placed in the period, delivered or not
pub fn order_status_metrics(records: &[SalesRecord]) -> GroupResult<OrderStatusMetrics> {
    let counts = orders_per_status(records);
    let total_orders: usize = counts.values().sum();
    if total_orders == 0 {
        return GroupResult::Empty;
    }

    let completed = counts.get(DELIVERED_STATUS).copied().unwrap_or(0);
    let mut statuses: Vec<StatusRow> = counts
        .into_iter()
        .map(|(status, orders)| StatusRow {
            percentage: percentage(orders as f64, total_orders as f64),
            status,
            orders,
        })
        .collect();
    statuses.sort_by(|a, b| b.orders.cmp(&a.orders).then_with(|| a.status.cmp(&b.status)));

    GroupResult::Computed(OrderStatusMetrics {
        statuses,
        total_orders,
        completion_rate: percentage(completed as f64, total_orders as f64),
    })
}

/// Shape of a record set: sizes, coverage and time span
pub fn summarize<R: AsRef<SalesRecord>>(records: &[R], columns: &AvailableColumns) -> DataSummary {
    let sales = || records.iter().map(|r| r.as_ref());

    let date_range = match (
        sales().map(|s| s.order_purchase_timestamp).min(),
        sales().map(|s| s.order_purchase_timestamp).max(),
    ) {
        (Some(start), Some(end)) => Some(DateSpan { start, end }),
        _ => None,
    };

    let product_categories = if columns.product_category {
        sales()
            .filter_map(|s| s.product_category_name.as_deref())
            .collect::<HashSet<_>>()
            .len()
    } else {
        0
    };
    let geographic_coverage = if columns.customer_location {
        sales()
            .filter_map(|s| s.customer_state.as_deref())
            .collect::<HashSet<_>>()
            .len()
    } else {
        0
    };

    DataSummary {
        total_records: records.len(),
        unique_orders: distinct_orders(records),
        unique_customers: distinct_customers(records),
        unique_products: sales().map(|s| s.product_id.as_str()).collect::<HashSet<_>>().len(),
        date_range,
        total_revenue: total_revenue(records),
        order_statuses: rows_per_status(records),
        product_categories,
        geographic_coverage,
    }
}
