//! Inventory metrics domain module.
//!
//! This crate contains the business rules for inventory risk and cost
//! tracking, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage):
//!
//! - [`metrics`]: raw item inputs → derived amounts, reorder figures and risk.
//! - [`aggregation`]: portfolio summaries over computed items.
//! - [`alerts`]: reorder alerts for the items that need attention.
//! - [`policy`]: the thresholds and multipliers the rules compare against.

pub mod aggregation;
pub mod alerts;
pub mod metrics;
pub mod policy;

pub use aggregation::{
    CostComparison, CostSummary, DashboardSummary, PortfolioSummary, RiskDistribution,
    cost_comparison, cost_summary, cost_summary_with, dashboard, projected_monthly_loss,
    risk_distribution, summarize,
};
pub use alerts::{ReorderAlert, actionable_alerts, reorder_alerts};
pub use metrics::{
    DerivedMetrics, InventoryItem, RawItemInput, RiskCategory, compute_metrics,
    compute_metrics_with, risk_category_for,
};
pub use policy::{ListingPolicy, MetricsPolicy};
