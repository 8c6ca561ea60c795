use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::period::PeriodSelector;
use crate::enums::{DeliveryCategory, DeliveryTimeBucket};

/// Request for the e-commerce KPI dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub year: i32,
    /// `None` selects all months of the year
    #[serde(default)]
    pub month: Option<u32>,
}

impl ReportRequest {
    pub fn selector(&self) -> PeriodSelector {
        PeriodSelector::new(self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Group results
// ---------------------------------------------------------------------------

/// Outcome of one metric group.
///
/// `Unavailable` means the input lacks the column the group needs,
/// `Empty` means the column exists but no row carries a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum GroupResult<T> {
    Unavailable { reason: String },
    Empty,
    Computed(T),
}

impl<T> GroupResult<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        GroupResult::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn computed(&self) -> Option<&T> {
        match self {
            GroupResult::Computed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, GroupResult::Unavailable { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, GroupResult::Empty)
    }
}

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub total_customers: usize,
    /// Mean of per-order revenue, not of line-item prices
    pub average_order_value: f64,
    pub period_description: String,
}

/// Period-over-period changes in percent. Zero whenever the comparison
/// value is zero or missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthRates {
    pub revenue_growth: f64,
    pub order_growth: f64,
    pub aov_growth: f64,
    pub delivery_days_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueMetrics {
    pub current_period: RevenueSummary,
    pub comparison_period: Option<RevenueSummary>,
    pub growth_rates: GrowthRates,
    /// Mean month-over-month revenue change inside the current period
    pub monthly_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendRow {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub revenue: f64,
    pub orders: usize,
    pub customers: usize,
    /// `None` for the first month of the sequence
    pub revenue_growth: Option<f64>,
    pub order_growth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrends {
    pub current: Vec<MonthlyTrendRow>,
    pub comparison: Vec<MonthlyTrendRow>,
}

// ---------------------------------------------------------------------------
// Breakdowns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub product_category_name: String,
    pub total_revenue: f64,
    pub avg_price: f64,
    pub total_items: usize,
    pub unique_orders: usize,
    pub unique_products: usize,
    pub revenue_share: f64,
    pub revenue_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPerformance {
    /// Sorted by descending revenue
    pub categories: Vec<CategoryRow>,
    pub top_category: String,
    pub total_categories: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRow {
    pub customer_state: String,
    pub total_revenue: f64,
    pub avg_price: f64,
    pub total_orders: usize,
    pub unique_customers: usize,
    pub revenue_share: f64,
    pub revenue_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicPerformance {
    /// Sorted by descending revenue
    pub states: Vec<StateRow>,
    pub top_state: String,
    pub total_states: usize,
    /// First five states by revenue
    pub top_states: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSatisfaction {
    pub average_score: f64,
    pub median_score: f64,
    /// Orders per score, keys 1..=5 always present
    pub score_distribution: BTreeMap<u8, usize>,
    pub total_reviews: usize,
    /// Percent of reviewed orders scoring 4 or 5
    pub satisfaction_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketCount {
    pub bucket: DeliveryCategory,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketScore<B> {
    pub bucket: B,
    pub average_review_score: f64,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPerformance {
    pub average_delivery_days: f64,
    pub median_delivery_days: f64,
    pub delivery_categories: Vec<BucketCount>,
    /// Percent of delivered orders that arrived within 7 days
    pub on_time_percentage: f64,
    /// `None` when review scores are unavailable
    pub satisfaction_by_delivery_speed: Option<Vec<BucketScore<DeliveryCategory>>>,
    pub satisfaction_by_delivery_time: Option<Vec<BucketScore<DeliveryTimeBucket>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRow {
    pub status: String,
    pub orders: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusMetrics {
    pub statuses: Vec<StatusRow>,
    pub total_orders: usize,
    /// Percentage of orders in status "delivered"
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    pub total_records: usize,
    pub unique_orders: usize,
    pub unique_customers: usize,
    pub unique_products: usize,
    pub date_range: Option<DateSpan>,
    pub total_revenue: f64,
    pub order_statuses: BTreeMap<String, usize>,
    pub product_categories: usize,
    pub geographic_coverage: usize,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// e.g. "2023 vs 2022"
    pub analysis_period: String,
    pub current_period: PeriodSelector,
    pub comparison_period: PeriodSelector,
    /// Informational only
    pub generated_at: DateTime<Utc>,
    pub data_summary: DataSummary,
    pub revenue: RevenueMetrics,
    pub monthly_trends: MonthlyTrends,
    pub product_performance: GroupResult<ProductPerformance>,
    pub geographic_performance: GroupResult<GeographicPerformance>,
    pub customer_satisfaction: GroupResult<CustomerSatisfaction>,
    pub delivery_performance: GroupResult<DeliveryPerformance>,
    pub order_status: GroupResult<OrderStatusMetrics>,
}

/// What a report query hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReportOutcome {
    /// The current period holds no delivered records
    NoData { period: PeriodSelector, message: String },
    Report(Box<MetricsReport>),
}

impl ReportOutcome {
    pub fn report(&self) -> Option<&MetricsReport> {
        match self {
            ReportOutcome::Report(report) => Some(&**report),
            ReportOutcome::NoData { .. } => None,
        }
    }
}
