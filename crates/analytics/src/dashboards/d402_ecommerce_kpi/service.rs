use chrono::Utc;
use contracts::dashboards::d402_ecommerce_kpi::{
    MetricsReport, MonthlyTrends, PeriodSelector, ReportOutcome, ReportRequest, RevenueMetrics,
};
use contracts::projections::p910_sales_records::{AvailableColumns, DeliveredRecord, SalesRecord};
use std::path::Path;

use super::breakdown::{geographic_performance, product_performance};
use super::cache::load_prepared;
use super::delivery::{average_delivery_days, delivery_performance};
use super::metrics::{growth_rates, monthly_growth, monthly_trends, revenue_summary};
use super::period::{filter_period, select_periods, PeriodSplit};
use super::satisfaction::customer_satisfaction;
use super::status::{order_status_metrics, summarize};
use crate::projections::p910_sales_records::PreparedDataset;
use crate::shared::error::PipelineError;

pub const NO_DATA_MESSAGE: &str = "No data available for the selected date range.";

/// Compose one report from a period split of delivered records.
///
/// `period_sales` are the current-period records of every status and only
/// feed the order status group.
pub fn assemble_report(
    split: &PeriodSplit<DeliveredRecord>,
    period_sales: &[SalesRecord],
    columns: &AvailableColumns,
) -> MetricsReport {
    let current_period = split.current_period;
    let comparison_period = split.comparison_period;

    // === REVENUE ===
    let current = revenue_summary(&split.current, &current_period.describe());
    let comparison = if split.comparison.is_empty() {
        None
    } else {
        Some(revenue_summary(&split.comparison, &comparison_period.describe()))
    };
    let delivery_days = (
        average_delivery_days(&split.current),
        average_delivery_days(&split.comparison),
    );
    let growth = growth_rates(&current, comparison.as_ref(), delivery_days);

    let revenue = RevenueMetrics {
        current_period: current,
        comparison_period: comparison,
        growth_rates: growth,
        monthly_growth: monthly_growth(&split.current),
    };

    // === TRENDS ===
    let trends = MonthlyTrends {
        current: monthly_trends(&split.current),
        comparison: monthly_trends(&split.comparison),
    };

    MetricsReport {
        analysis_period: format!(
            "{} vs {}",
            current_period.describe(),
            comparison_period.describe()
        ),
        current_period,
        comparison_period,
        generated_at: Utc::now(),
        data_summary: summarize(&split.current, columns),
        revenue,
        monthly_trends: trends,
        product_performance: product_performance(&split.current, &split.comparison, columns),
        geographic_performance: geographic_performance(&split.current, &split.comparison, columns),
        customer_satisfaction: customer_satisfaction(&split.current, columns),
        delivery_performance: delivery_performance(&split.current, columns),
        order_status: order_status_metrics(period_sales),
    }
}

/// Run one report query against a prepared dataset
pub fn build_report(dataset: &PreparedDataset, selector: PeriodSelector) -> ReportOutcome {
    let split = select_periods(&dataset.delivered, selector);

    if split.current.is_empty() {
        tracing::warn!("No delivered records for {}", selector);
        return ReportOutcome::NoData {
            period: selector,
            message: NO_DATA_MESSAGE.to_string(),
        };
    }

    tracing::info!(
        "Building report for {}: {} current records, {} comparison records",
        selector,
        split.current.len(),
        split.comparison.len()
    );

    let period_sales = filter_period(&dataset.sales, selector);
    let report = assemble_report(&split, &period_sales, &dataset.columns);
    ReportOutcome::Report(Box::new(report))
}

/// Load (or reuse) the prepared dataset under `base` and run the query
pub fn generate_report(base: &Path, request: &ReportRequest) -> Result<ReportOutcome, PipelineError> {
    let dataset = load_prepared(base)?;
    Ok(build_report(&dataset, request.selector()))
}
