use contracts::dashboards::d402_ecommerce_kpi::{
    GrowthRates, MonthlyTrendRow, RevenueSummary,
};
use contracts::projections::p910_sales_records::SalesRecord;
use std::collections::{BTreeMap, HashSet};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median with the two middle values averaged for even counts
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// `part / total * 100`, zero when `total` is zero
pub fn percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

/// Percent change from `comparison` to `current`.
///
/// Zero when the comparison value is zero or absent.
pub fn growth_rate(current: f64, comparison: Option<f64>) -> f64 {
    match comparison {
        Some(previous) if previous != 0.0 => {
            let change = (current - previous) / previous * 100.0;
            if change.is_finite() {
                change
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

pub fn total_revenue<R: AsRef<SalesRecord>>(records: &[R]) -> f64 {
    records.iter().map(|r| r.as_ref().price).sum()
}

pub fn distinct_orders<R: AsRef<SalesRecord>>(records: &[R]) -> usize {
    records
        .iter()
        .map(|r| r.as_ref().order_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub fn distinct_customers<R: AsRef<SalesRecord>>(records: &[R]) -> usize {
    records
        .iter()
        .map(|r| r.as_ref().customer_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Revenue per order id, in order id order
pub fn order_totals<R: AsRef<SalesRecord>>(records: &[R]) -> BTreeMap<&str, f64> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for r in records {
        let sale = r.as_ref();
        *totals.entry(sale.order_id.as_str()).or_insert(0.0) += sale.price;
    }
    totals
}

/// Mean of per-order sums, zero for an empty set
pub fn average_order_value<R: AsRef<SalesRecord>>(records: &[R]) -> f64 {
    let totals: Vec<f64> = order_totals(records).into_values().collect();
    mean(&totals).unwrap_or(0.0)
}

pub fn revenue_summary<R: AsRef<SalesRecord>>(records: &[R], period_description: &str) -> RevenueSummary {
    RevenueSummary {
        total_revenue: total_revenue(records),
        total_orders: distinct_orders(records),
        total_customers: distinct_customers(records),
        average_order_value: average_order_value(records),
        period_description: period_description.to_string(),
    }
}

/// Growth of the headline figures. Every rate is zero without a comparison.
pub fn growth_rates(
    current: &RevenueSummary,
    comparison: Option<&RevenueSummary>,
    delivery_days: (Option<f64>, Option<f64>),
) -> GrowthRates {
    let (current_days, comparison_days) = delivery_days;
    GrowthRates {
        revenue_growth: growth_rate(current.total_revenue, comparison.map(|c| c.total_revenue)),
        order_growth: growth_rate(
            current.total_orders as f64,
            comparison.map(|c| c.total_orders as f64),
        ),
        aov_growth: growth_rate(
            current.average_order_value,
            comparison.map(|c| c.average_order_value),
        ),
        delivery_days_growth: match current_days {
            Some(days) => growth_rate(days, comparison_days),
            None => 0.0,
        },
    }
}

#[derive(Default)]
struct MonthAcc<'a> {
    revenue: f64,
    orders: HashSet<&'a str>,
    customers: HashSet<&'a str>,
}

/// One row per calendar month present, oldest first
pub fn monthly_trends<R: AsRef<SalesRecord>>(records: &[R]) -> Vec<MonthlyTrendRow> {
    let mut months: BTreeMap<(i32, u32), MonthAcc> = BTreeMap::new();
    for r in records {
        let sale = r.as_ref();
        let acc = months.entry((sale.year, sale.month)).or_default();
        acc.revenue += sale.price;
        acc.orders.insert(sale.order_id.as_str());
        acc.customers.insert(sale.customer_id.as_str());
    }

    let mut rows: Vec<MonthlyTrendRow> = Vec::with_capacity(months.len());
    for ((year, month), acc) in months {
        let (revenue_growth, order_growth) = match rows.last() {
            Some(prev) => (
                Some(growth_rate(acc.revenue, Some(prev.revenue))),
                Some(growth_rate(acc.orders.len() as f64, Some(prev.orders as f64))),
            ),
            None => (None, None),
        };
        rows.push(MonthlyTrendRow {
            year,
            month,
            month_name: month_name(month).to_string(),
            revenue: acc.revenue,
            orders: acc.orders.len(),
            customers: acc.customers.len(),
            revenue_growth,
            order_growth,
        });
    }
    rows
}

/// Mean month-over-month revenue change; zero with fewer than two months
pub fn monthly_growth<R: AsRef<SalesRecord>>(records: &[R]) -> f64 {
    let changes: Vec<f64> = monthly_trends(records)
        .iter()
        .filter_map(|row| row.revenue_growth)
        .collect();
    mean(&changes).unwrap_or(0.0)
}
