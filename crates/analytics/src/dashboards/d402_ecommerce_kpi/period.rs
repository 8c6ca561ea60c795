use contracts::dashboards::d402_ecommerce_kpi::{DateRange, PeriodSelector};
use contracts::projections::p910_sales_records::SalesRecord;

/// Current period and the same selection one year earlier
#[derive(Debug, Clone)]
pub struct PeriodSplit<R> {
    pub current_period: PeriodSelector,
    pub comparison_period: PeriodSelector,
    pub current: Vec<R>,
    pub comparison: Vec<R>,
}

pub fn filter_period<R>(records: &[R], selector: PeriodSelector) -> Vec<R>
where
    R: AsRef<SalesRecord> + Clone,
{
    records
        .iter()
        .filter(|r| {
            let sale = r.as_ref();
            selector.matches(sale.year, sale.month)
        })
        .cloned()
        .collect()
}

pub fn select_periods<R>(records: &[R], selector: PeriodSelector) -> PeriodSplit<R>
where
    R: AsRef<SalesRecord> + Clone,
{
    let comparison_period = selector.previous_year();
    PeriodSplit {
        current_period: selector,
        comparison_period,
        current: filter_period(records, selector),
        comparison: filter_period(records, comparison_period),
    }
}

pub fn filter_by_date_range<R>(records: &[R], range: &DateRange) -> Vec<R>
where
    R: AsRef<SalesRecord> + Clone,
{
    let filtered: Vec<R> = records
        .iter()
        .filter(|r| {
            let sale = r.as_ref();
            range.contains(sale.year, sale.month)
        })
        .cloned()
        .collect();

    tracing::debug!(
        "Filtered to {} records for {}",
        filtered.len(),
        range.describe()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projections::p910_sales_records::fixtures::sale;

    fn records() -> Vec<SalesRecord> {
        vec![
            sale("a", 1, 10.0, "2023-01-15 10:00:00"),
            sale("b", 1, 20.0, "2023-06-15 10:00:00"),
            sale("c", 1, 30.0, "2022-06-01 10:00:00"),
            sale("d", 1, 40.0, "2022-12-31 23:59:59"),
            sale("e", 1, 50.0, "2021-06-01 10:00:00"),
        ]
    }

    fn ids(records: &[SalesRecord]) -> Vec<&str> {
        records.iter().map(|r| r.order_id.as_str()).collect()
    }

    #[test]
    fn test_year_selection_compares_with_previous_year() {
        let split = select_periods(&records(), PeriodSelector::new(2023, None));
        assert_eq!(ids(&split.current), vec!["a", "b"]);
        assert_eq!(ids(&split.comparison), vec!["c", "d"]);
        assert_eq!(split.comparison_period, PeriodSelector::Year { year: 2022 });
    }

    #[test]
    fn test_month_selection_keeps_month_in_comparison() {
        let split = select_periods(&records(), PeriodSelector::new(2023, Some(6)));
        assert_eq!(ids(&split.current), vec!["b"]);
        assert_eq!(ids(&split.comparison), vec!["c"]);
    }

    #[test]
    fn test_comparison_may_be_empty() {
        let split = select_periods(&records(), PeriodSelector::new(2022, Some(12)));
        assert_eq!(ids(&split.current), vec!["d"]);
        assert!(split.comparison.is_empty());
    }

    #[test]
    fn test_date_range_filter() {
        let range = DateRange {
            start_year: Some(2022),
            end_month: Some(6),
            ..Default::default()
        };
        assert_eq!(ids(&filter_by_date_range(&records(), &range)), vec!["a", "b", "c"]);
    }
}
