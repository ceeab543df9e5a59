//! Aggregation service: portfolio-level summaries over computed items.
//!
//! Every function here is a read-only fold over its input. Items must have
//! been through the metrics engine; one that was not fails the whole call with
//! an invariant violation rather than being skipped.
//!
//! Inputs are any iterable of values that are `AsRef<InventoryItem>`, so both
//! bare items and storage records wrapping them can be summarized directly.

use serde::{Deserialize, Serialize};

use stockpilot_core::DomainResult;

use crate::metrics::{InventoryItem, RiskCategory};
use crate::policy::MetricsPolicy;

/// Item counts per risk category.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDistribution {
    pub critical_count: usize,
    pub warning_count: usize,
    pub safe_count: usize,
}

impl RiskDistribution {
    fn record(&mut self, category: RiskCategory) {
        match category {
            RiskCategory::Critical => self.critical_count += 1,
            RiskCategory::Warning => self.warning_count += 1,
            RiskCategory::Safe => self.safe_count += 1,
        }
    }

    pub fn count(&self, category: RiskCategory) -> usize {
        match category {
            RiskCategory::Critical => self.critical_count,
            RiskCategory::Warning => self.warning_count,
            RiskCategory::Safe => self.safe_count,
        }
    }

    pub fn total(&self) -> usize {
        self.critical_count + self.warning_count + self.safe_count
    }
}

/// Totals and risk counts over a set of items. Empty input gives all zeros.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_planned_cost: f64,
    pub total_actual_cost: f64,
    pub total_variance: f64,
    pub critical_item_count: usize,
    /// Serialized inline as `criticalCount`, `warningCount`, `safeCount`.
    #[serde(flatten)]
    pub risk_distribution: RiskDistribution,
}

/// Cost/variance summary with the projected monthly loss.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    #[serde(flatten)]
    pub summary: PortfolioSummary,
    pub projected_monthly_loss: f64,
}

/// Dashboard payload: totals plus the first `n` items in caller order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary<T> {
    pub summary: PortfolioSummary,
    pub recent_items: Vec<T>,
}

/// Planned vs actual spend for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostComparison {
    pub item_name: String,
    pub planned_amount: f64,
    pub actual_amount: f64,
}

pub fn summarize<I>(items: I) -> DomainResult<PortfolioSummary>
where
    I: IntoIterator,
    I::Item: AsRef<InventoryItem>,
{
    let mut summary = items
        .into_iter()
        .try_fold(PortfolioSummary::default(), |mut acc, item| {
            let metrics = item.as_ref().require_metrics()?;
            acc.total_planned_cost += metrics.planned_amount;
            acc.total_actual_cost += metrics.actual_amount;
            acc.total_variance += metrics.variance;
            acc.risk_distribution.record(metrics.risk_category);
            DomainResult::Ok(acc)
        })?;
    summary.critical_item_count = summary.risk_distribution.critical_count;
    Ok(summary)
}

/// `total_variance * loss_projection_days` when overspending, zero otherwise.
pub fn projected_monthly_loss(total_variance: f64, policy: &MetricsPolicy) -> f64 {
    if total_variance > 0.0 {
        total_variance * policy.loss_projection_days
    } else {
        0.0
    }
}

pub fn cost_summary<I>(items: I) -> DomainResult<CostSummary>
where
    I: IntoIterator,
    I::Item: AsRef<InventoryItem>,
{
    cost_summary_with(items, &MetricsPolicy::default())
}

pub fn cost_summary_with<I>(items: I, policy: &MetricsPolicy) -> DomainResult<CostSummary>
where
    I: IntoIterator,
    I::Item: AsRef<InventoryItem>,
{
    let summary = summarize(items)?;
    Ok(CostSummary {
        summary,
        projected_monthly_loss: projected_monthly_loss(summary.total_variance, policy),
    })
}

/// Summarize all of `items` and keep the first `recent_limit` of them.
///
/// Recency is the caller's ordering; nothing is sorted here.
pub fn dashboard<T>(items: &[T], recent_limit: usize) -> DomainResult<DashboardSummary<T>>
where
    T: AsRef<InventoryItem> + Clone,
{
    let summary = summarize(items)?;
    Ok(DashboardSummary {
        summary,
        recent_items: items.iter().take(recent_limit).cloned().collect(),
    })
}

pub fn risk_distribution<I>(items: I) -> DomainResult<RiskDistribution>
where
    I: IntoIterator,
    I::Item: AsRef<InventoryItem>,
{
    summarize(items).map(|s| s.risk_distribution)
}

pub fn cost_comparison<I>(items: I) -> DomainResult<Vec<CostComparison>>
where
    I: IntoIterator,
    I::Item: AsRef<InventoryItem>,
{
    items
        .into_iter()
        .map(|item| {
            let item = item.as_ref();
            let metrics = item.require_metrics()?;
            Ok(CostComparison {
                item_name: item.item_name().to_string(),
                planned_amount: metrics.planned_amount,
                actual_amount: metrics.actual_amount,
            })
        })
        .collect()
}
