use contracts::dashboards::d402_ecommerce_kpi::{
    CategoryRow, GeographicPerformance, GroupResult, ProductPerformance, StateRow,
};
use contracts::projections::p910_sales_records::{AvailableColumns, SalesRecord};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::metrics::{growth_rate, percentage, total_revenue};

const TOP_STATES: usize = 5;

#[derive(Default)]
struct GroupAcc<'a> {
    revenue: f64,
    items: usize,
    orders: HashSet<&'a str>,
    members: HashSet<&'a str>,
}

/// Accumulate rows by key. Rows without a key are left out. `member`
/// selects what the distinct-member count counts (products, customers).
fn group_by<'a, R, K, M>(records: &'a [R], key: K, member: M) -> BTreeMap<&'a str, GroupAcc<'a>>
where
    R: AsRef<SalesRecord>,
    K: Fn(&'a SalesRecord) -> Option<&'a str>,
    M: Fn(&'a SalesRecord) -> &'a str,
{
    let mut groups: BTreeMap<&str, GroupAcc> = BTreeMap::new();
    for r in records {
        let sale = r.as_ref();
        let Some(k) = key(sale) else {
            continue;
        };
        let acc = groups.entry(k).or_default();
        acc.revenue += sale.price;
        acc.items += 1;
        acc.orders.insert(sale.order_id.as_str());
        acc.members.insert(member(sale));
    }
    groups
}

fn revenue_by<'a, R, K>(records: &'a [R], key: K) -> HashMap<&'a str, f64>
where
    R: AsRef<SalesRecord>,
    K: Fn(&'a SalesRecord) -> Option<&'a str>,
{
    let mut totals = HashMap::new();
    for r in records {
        if let Some(k) = key(r.as_ref()) {
            *totals.entry(k).or_insert(0.0) += r.as_ref().price;
        }
    }
    totals
}

/// Stable descending sort, so equal revenues keep key order
fn sort_by_revenue_desc<T>(rows: &mut [T], revenue: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| revenue(b).total_cmp(&revenue(a)));
}

fn category_of(sale: &SalesRecord) -> Option<&str> {
    sale.product_category_name.as_deref()
}

fn state_of(sale: &SalesRecord) -> Option<&str> {
    sale.customer_state.as_deref()
}

/// Revenue by product category with share of total and growth versus the
/// same category in `comparison`.
pub fn product_performance<R: AsRef<SalesRecord>>(
    current: &[R],
    comparison: &[R],
    columns: &AvailableColumns,
) -> GroupResult<ProductPerformance> {
    if !columns.product_category {
        return GroupResult::unavailable("Product category information not available");
    }

    let groups = group_by(current, category_of, |s| s.product_id.as_str());
    if groups.is_empty() {
        return GroupResult::Empty;
    }

    let overall = total_revenue(current);
    let previous = revenue_by(comparison, category_of);

    let mut categories: Vec<CategoryRow> = groups
        .into_iter()
        .map(|(name, acc)| CategoryRow {
            product_category_name: name.to_string(),
            total_revenue: acc.revenue,
            avg_price: acc.revenue / acc.items as f64,
            total_items: acc.items,
            unique_orders: acc.orders.len(),
            unique_products: acc.members.len(),
            revenue_share: percentage(acc.revenue, overall),
            revenue_growth: growth_rate(acc.revenue, previous.get(name).copied()),
        })
        .collect();
    sort_by_revenue_desc(&mut categories, |row| row.total_revenue);

    GroupResult::Computed(ProductPerformance {
        top_category: categories[0].product_category_name.clone(),
        total_categories: categories.len(),
        categories,
    })
}

/// Revenue by customer state
pub fn geographic_performance<R: AsRef<SalesRecord>>(
    current: &[R],
    comparison: &[R],
    columns: &AvailableColumns,
) -> GroupResult<GeographicPerformance> {
    if !columns.customer_location {
        return GroupResult::unavailable("Geographic information not available");
    }

    let groups = group_by(current, state_of, |s| s.customer_id.as_str());
    if groups.is_empty() {
        return GroupResult::Empty;
    }

    let overall = total_revenue(current);
    let previous = revenue_by(comparison, state_of);

    let mut states: Vec<StateRow> = groups
        .into_iter()
        .map(|(state, acc)| StateRow {
            customer_state: state.to_string(),
            total_revenue: acc.revenue,
            avg_price: acc.revenue / acc.items as f64,
            total_orders: acc.orders.len(),
            unique_customers: acc.members.len(),
            revenue_share: percentage(acc.revenue, overall),
            revenue_growth: growth_rate(acc.revenue, previous.get(state).copied()),
        })
        .collect();
    sort_by_revenue_desc(&mut states, |row| row.total_revenue);

    GroupResult::Computed(GeographicPerformance {
        top_state: states[0].customer_state.clone(),
        total_states: states.len(),
        top_states: states
            .iter()
            .take(TOP_STATES)
            .map(|s| s.customer_state.clone())
            .collect(),
        states,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::p910_sales_records::fixtures::sale;

    fn with_category(mut record: SalesRecord, category: Option<&str>) -> SalesRecord {
        record.product_category_name = category.map(str::to_string);
        record
    }

    fn with_state(mut record: SalesRecord, state: &str) -> SalesRecord {
        record.customer_state = Some(state.to_string());
        record
    }

    #[test]
    fn test_categories_sorted_with_stable_ties() {
        let records = vec![
            with_category(sale("o1", 1, 30.0, "2023-01-01 00:00:00"), Some("toys")),
            with_category(sale("o1", 2, 20.0, "2023-01-01 00:00:00"), Some("books")),
            with_category(sale("o2", 1, 50.0, "2023-01-02 00:00:00"), Some("garden")),
            with_category(sale("o3", 1, 20.0, "2023-01-03 00:00:00"), Some("toys")),
        ];

        let result = product_performance(&records, &[], &AvailableColumns::all());
        let performance = result.computed().unwrap();
        let order: Vec<_> = performance
            .categories
            .iter()
            .map(|c| c.product_category_name.as_str())
            .collect();
        // garden and toys tie on 50, key order decides
        assert_eq!(order, vec!["garden", "toys", "books"]);
        assert_eq!(performance.top_category, "garden");
        assert_eq!(performance.total_categories, 3);

        let toys = &performance.categories[1];
        assert_eq!(toys.total_items, 2);
        assert_eq!(toys.unique_orders, 2);
        assert_eq!(toys.unique_products, 2);
        assert_eq!(toys.avg_price, 25.0);
        assert!((toys.revenue_share - 50.0 / 120.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_revenue_share_sums_to_hundred() {
        let records = vec![
            with_category(sale("o1", 1, 12.34, "2023-01-01 00:00:00"), Some("a")),
            with_category(sale("o2", 1, 56.78, "2023-01-01 00:00:00"), Some("b")),
            with_category(sale("o3", 1, 90.12, "2023-01-01 00:00:00"), Some("c")),
            with_category(sale("o4", 1, 3.45, "2023-01-01 00:00:00"), Some("a")),
        ];
        let result = product_performance(&records, &[], &AvailableColumns::all());
        let total: f64 = result
            .computed()
            .unwrap()
            .categories
            .iter()
            .map(|c| c.revenue_share)
            .sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_null_categories_are_not_a_group() {
        let records = vec![
            with_category(sale("o1", 1, 10.0, "2023-01-01 00:00:00"), None),
            with_category(sale("o2", 1, 30.0, "2023-01-01 00:00:00"), Some("toys")),
        ];
        let result = product_performance(&records, &[], &AvailableColumns::all());
        let performance = result.computed().unwrap();
        assert_eq!(performance.total_categories, 1);
        assert_eq!(performance.categories[0].revenue_share, 75.0);
    }

    #[test]
    fn test_unavailable_versus_empty() {
        let columns = AvailableColumns {
            product_category: false,
            ..AvailableColumns::all()
        };
        let records = vec![sale("o1", 1, 10.0, "2023-01-01 00:00:00")];
        assert!(product_performance(&records, &[], &columns).is_unavailable());

        let uncategorized = vec![with_category(sale("o1", 1, 10.0, "2023-01-01 00:00:00"), None)];
        assert!(product_performance(&uncategorized, &[], &AvailableColumns::all()).is_empty());
    }

    #[test]
    fn test_category_growth_against_comparison() {
        let current = vec![
            with_category(sale("o1", 1, 150.0, "2023-01-01 00:00:00"), Some("toys")),
            with_category(sale("o2", 1, 40.0, "2023-01-01 00:00:00"), Some("books")),
        ];
        let comparison = vec![with_category(sale("p1", 1, 100.0, "2022-01-01 00:00:00"), Some("toys"))];
        let result = product_performance(&current, &comparison, &AvailableColumns::all());
        let rows = &result.computed().unwrap().categories;
        assert_eq!(rows[0].revenue_growth, 50.0);
        // absent in the comparison period
        assert_eq!(rows[1].revenue_growth, 0.0);
    }

    #[test]
    fn test_geographic_performance() {
        let mut records = vec![
            with_state(sale("o1", 1, 10.0, "2023-01-01 00:00:00"), "RJ"),
            with_state(sale("o2", 1, 30.0, "2023-01-01 00:00:00"), "SP"),
            with_state(sale("o2", 2, 30.0, "2023-01-01 00:00:00"), "SP"),
            with_state(sale("o3", 1, 5.0, "2023-01-01 00:00:00"), "MG"),
            with_state(sale("o4", 1, 4.0, "2023-01-01 00:00:00"), "BA"),
            with_state(sale("o5", 1, 3.0, "2023-01-01 00:00:00"), "PR"),
            with_state(sale("o6", 1, 2.0, "2023-01-01 00:00:00"), "RS"),
        ];
        records[0].customer_id = "c-o2".to_string();

        let comparison = vec![with_state(sale("x", 1, 0.0, "2022-01-01 00:00:00"), "SP")];
        let result = geographic_performance(&records, &comparison, &AvailableColumns::all());
        let geo = result.computed().unwrap();

        assert_eq!(geo.top_state, "SP");
        assert_eq!(geo.total_states, 6);
        assert_eq!(geo.top_states, vec!["SP", "RJ", "MG", "BA", "PR"]);
        let sp = &geo.states[0];
        assert_eq!(sp.total_orders, 1);
        assert_eq!(sp.unique_customers, 1);
        assert_eq!(sp.avg_price, 30.0);
        assert_eq!(sp.revenue_growth, 0.0, "zero comparison revenue");

        let no_geo = AvailableColumns {
            customer_location: false,
            ..AvailableColumns::all()
        };
        assert!(geographic_performance(&records, &[], &no_geo).is_unavailable());
    }
}
