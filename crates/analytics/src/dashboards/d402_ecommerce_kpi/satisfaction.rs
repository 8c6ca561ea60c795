use contracts::dashboards::d402_ecommerce_kpi::{CustomerSatisfaction, GroupResult};
use contracts::projections::p910_sales_records::{AvailableColumns, SalesRecord};
use std::collections::{BTreeMap, HashSet};

use super::metrics::{mean, median, percentage};

/// One review score per order: the first non-null score seen for it.
///
/// Line items and fanned-out review rows of the same order collapse here.
pub fn order_review_scores<R: AsRef<SalesRecord>>(records: &[R]) -> Vec<u8> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut scores = Vec::new();
    for r in records {
        let sale = r.as_ref();
        if let Some(score) = sale.review_score {
            if seen.insert(sale.order_id.as_str()) {
                scores.push(score);
            }
        }
    }
    scores
}

pub fn customer_satisfaction<R: AsRef<SalesRecord>>(
    records: &[R],
    columns: &AvailableColumns,
) -> GroupResult<CustomerSatisfaction> {
    if !columns.review_score {
        return GroupResult::unavailable("Review score information not available");
    }

    let scores = order_review_scores(records);
    if scores.is_empty() {
        return GroupResult::Empty;
    }

    let values: Vec<f64> = scores.iter().map(|s| f64::from(*s)).collect();
    let mut score_distribution: BTreeMap<u8, usize> = (1..=5).map(|s| (s, 0)).collect();
    for score in &scores {
        *score_distribution.entry(*score).or_insert(0) += 1;
    }
    let satisfied = scores.iter().filter(|s| **s >= 4).count();

    GroupResult::Computed(CustomerSatisfaction {
        average_score: mean(&values).unwrap_or(0.0),
        median_score: median(&values).unwrap_or(0.0),
        score_distribution,
        total_reviews: scores.len(),
        satisfaction_rate: percentage(satisfied as f64, scores.len() as f64),
    })
}
