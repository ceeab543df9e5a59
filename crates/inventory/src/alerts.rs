//! Reorder alerts derived from computed items.

use serde::{Deserialize, Serialize};

use stockpilot_core::DomainResult;

use crate::metrics::{InventoryItem, RiskCategory};

/// Replenishment signal for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderAlert {
    pub item_name: String,
    pub risk_category: RiskCategory,
    /// Risk score rounded to the nearest whole percent.
    pub risk_percent: u8,
    pub current_stock: f64,
    pub reorder_level: f64,
    pub suggested_reorder_qty: f64,
    /// Set for critical items: stock may run out before replenishment lands.
    pub production_at_risk: bool,
}

impl ReorderAlert {
    pub fn from_item(item: &InventoryItem) -> DomainResult<Self> {
        let metrics = item.require_metrics()?;
        Ok(Self {
            item_name: item.item_name().to_string(),
            risk_category: metrics.risk_category,
            // risk_score is clamped to [0, 100]
            risk_percent: metrics.risk_score.round() as u8,
            current_stock: item.input().current_stock,
            reorder_level: metrics.reorder_level,
            suggested_reorder_qty: metrics.reorder_qty,
            production_at_risk: metrics.risk_category == RiskCategory::Critical,
        })
    }
}

/// One alert per item, in input order.
pub fn reorder_alerts<I>(items: I) -> DomainResult<Vec<ReorderAlert>>
where
    I: IntoIterator,
    I::Item: AsRef<InventoryItem>,
{
    items
        .into_iter()
        .map(|item| ReorderAlert::from_item(item.as_ref()))
        .collect()
}

/// Alerts for warning and critical items only, most severe first.
///
/// Items of the same category keep their input order.
pub fn actionable_alerts<I>(items: I) -> DomainResult<Vec<ReorderAlert>>
where
    I: IntoIterator,
    I::Item: AsRef<InventoryItem>,
{
    let mut alerts = reorder_alerts(items)?;
    alerts.retain(|a| a.risk_category != RiskCategory::Safe);
    alerts.sort_by_key(|a| core::cmp::Reverse(a.risk_category.severity()));
    Ok(alerts)
}
