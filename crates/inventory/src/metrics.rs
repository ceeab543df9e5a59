//! Metrics engine: raw item inputs → derived cost, reorder and risk metrics.
//!
//! The engine is a pure function. It validates the nine raw attributes, trims
//! the item name, and derives every metric in one pass; there is no way to set
//! a derived field independently of the raw fields it comes from.

use serde::{Deserialize, Serialize};

use stockpilot_core::{DomainError, DomainResult};

use crate::policy::{MAX_RISK_SCORE, MIN_RISK_SCORE, MetricsPolicy};

pub const ITEM_NAME_REQUIRED: &str = "Item name is required";
pub const QUANTITIES_AND_RATES_NON_NEGATIVE: &str = "Quantities and rates must be positive";
pub const STOCK_VALUES_NON_NEGATIVE: &str = "Stock values must be positive";
pub const VALUES_TOO_LARGE: &str = "Values are too large to compute metrics";

/// Caller-supplied attributes of one inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItemInput {
    pub item_name: String,
    pub planned_qty: f64,
    pub planned_rate: f64,
    pub actual_qty: f64,
    pub actual_rate: f64,
    pub current_stock: f64,
    pub daily_consumption: f64,
    /// Supplier lead time in days.
    pub lead_time: f64,
    pub safety_stock: f64,
}

impl RawItemInput {
    /// Check the input rules in order and report the first one broken.
    ///
    /// Non-finite numbers fail the rule of the group they belong to.
    pub fn validate(&self, policy: &MetricsPolicy) -> DomainResult<()> {
        if self.item_name.trim().is_empty() {
            return Err(DomainError::validation(ITEM_NAME_REQUIRED));
        }

        let procurement = [self.planned_qty, self.planned_rate, self.actual_qty, self.actual_rate];
        if !procurement.iter().all(|v| is_non_negative(*v)) {
            return Err(DomainError::validation(QUANTITIES_AND_RATES_NON_NEGATIVE));
        }

        let stock = [
            self.current_stock,
            self.daily_consumption,
            self.lead_time,
            self.safety_stock,
        ];
        if !stock.iter().all(|v| is_non_negative(*v)) {
            return Err(DomainError::validation(STOCK_VALUES_NON_NEGATIVE));
        }

        if self.lead_time > policy.max_lead_time_days {
            return Err(DomainError::validation(format!(
                "Lead time cannot exceed {} days",
                policy.max_lead_time_days
            )));
        }

        Ok(())
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Bucketed risk score.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Safe,
    Warning,
    Critical,
}

impl RiskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Safe => "Safe",
            RiskCategory::Warning => "Warning",
            RiskCategory::Critical => "Critical",
        }
    }

    /// Ordering key, higher is more urgent.
    pub fn severity(self) -> u8 {
        match self {
            RiskCategory::Safe => 0,
            RiskCategory::Warning => 1,
            RiskCategory::Critical => 2,
        }
    }
}

impl core::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a clamped risk score to its category.
///
/// `Critical` is strictly above its threshold, `Warning` is inclusive.
pub fn risk_category_for(risk_score: f64, policy: &MetricsPolicy) -> RiskCategory {
    if risk_score > policy.critical_above {
        RiskCategory::Critical
    } else if risk_score >= policy.warning_at_or_above {
        RiskCategory::Warning
    } else {
        RiskCategory::Safe
    }
}

/// Fields the engine derives from a [`RawItemInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub planned_amount: f64,
    pub actual_amount: f64,
    /// `actual_amount - planned_amount`; positive means overspend.
    pub variance: f64,
    pub reorder_level: f64,
    /// Never negative.
    pub reorder_qty: f64,
    /// Always within `[0, 100]`.
    pub risk_score: f64,
    pub risk_category: RiskCategory,
}

impl DerivedMetrics {
    /// Fails when a finite input overflows an intermediate value.
    fn derive(input: &RawItemInput, policy: &MetricsPolicy) -> DomainResult<Self> {
        let planned_amount = input.planned_qty * input.planned_rate;
        let actual_amount = input.actual_qty * input.actual_rate;
        let variance = actual_amount - planned_amount;

        let reorder_level = input.daily_consumption * input.lead_time + input.safety_stock;
        let reorder_qty = (reorder_level - input.current_stock).max(0.0);

        let raw_score = if reorder_level > 0.0 {
            ((reorder_level - input.current_stock) / reorder_level) * 100.0
        } else {
            0.0
        };

        let amounts = [planned_amount, actual_amount, variance, reorder_level, reorder_qty, raw_score];
        if !amounts.iter().all(|v| v.is_finite()) {
            return Err(DomainError::validation(VALUES_TOO_LARGE));
        }
        let risk_score = raw_score.clamp(MIN_RISK_SCORE, MAX_RISK_SCORE);

        Ok(Self {
            planned_amount,
            actual_amount,
            variance,
            reorder_level,
            reorder_qty,
            risk_score,
            risk_category: risk_category_for(risk_score, policy),
        })
    }

    /// Whether these figures are what the engine derives from `input`.
    ///
    /// The category is not compared; it depends on the policy in force.
    fn agrees_with(&self, input: &RawItemInput) -> bool {
        let Ok(expected) = Self::derive(input, &MetricsPolicy::default()) else {
            return false;
        };
        let pairs = [
            (self.planned_amount, expected.planned_amount),
            (self.actual_amount, expected.actual_amount),
            (self.variance, expected.variance),
            (self.reorder_level, expected.reorder_level),
            (self.reorder_qty, expected.reorder_qty),
            (self.risk_score, expected.risk_score),
        ];
        pairs.iter().all(|(stored, derived)| nearly_equal(*stored, *derived))
    }
}

// Text round-trips of floats may move the last bit.
fn nearly_equal(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}

/// One tracked item: raw attributes plus, once computed, its derived metrics.
///
/// Only the engine produces an item with metrics. An item built with
/// [`InventoryItem::pending`] (or read back from storage without derived
/// fields) is awaiting recomputation and is rejected by aggregation.
///
/// Deserialized derived fields are checked against the raw fields; a record
/// whose figures disagree with its inputs is refused rather than trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord")]
pub struct InventoryItem {
    #[serde(flatten)]
    input: RawItemInput,
    #[serde(flatten)]
    metrics: Option<DerivedMetrics>,
}

impl InventoryItem {
    /// Wrap raw input that has not been through the engine yet.
    pub fn pending(input: RawItemInput) -> Self {
        Self { input, metrics: None }
    }

    /// Run this item's raw attributes through the engine.
    pub fn recompute(self) -> DomainResult<Self> {
        compute_metrics(self.input)
    }

    pub fn recompute_with(self, policy: &MetricsPolicy) -> DomainResult<Self> {
        compute_metrics_with(self.input, policy)
    }

    pub fn input(&self) -> &RawItemInput {
        &self.input
    }

    pub fn item_name(&self) -> &str {
        &self.input.item_name
    }

    pub fn metrics(&self) -> Option<&DerivedMetrics> {
        self.metrics.as_ref()
    }

    pub fn is_computed(&self) -> bool {
        self.metrics.is_some()
    }

    /// Derived metrics, or an invariant violation if the item bypassed the engine.
    pub fn require_metrics(&self) -> DomainResult<&DerivedMetrics> {
        self.metrics.as_ref().ok_or_else(|| {
            DomainError::invariant(format!(
                "item '{}' has no derived metrics; it was never computed",
                self.input.item_name
            ))
        })
    }

    pub fn into_input(self) -> RawItemInput {
        self.input
    }
}

/// Wire shape of an item before its derived fields are checked.
#[derive(Deserialize)]
struct ItemRecord {
    #[serde(flatten)]
    input: RawItemInput,
    #[serde(flatten)]
    metrics: Option<DerivedMetrics>,
}

impl TryFrom<ItemRecord> for InventoryItem {
    type Error = DomainError;

    fn try_from(record: ItemRecord) -> DomainResult<Self> {
        if let Some(metrics) = &record.metrics {
            if !metrics.agrees_with(&record.input) {
                return Err(DomainError::invariant(format!(
                    "derived fields of item '{}' do not match its raw fields",
                    record.input.item_name
                )));
            }
        }
        Ok(Self {
            input: record.input,
            metrics: record.metrics,
        })
    }
}

impl AsRef<InventoryItem> for InventoryItem {
    fn as_ref(&self) -> &InventoryItem {
        self
    }
}

/// Validate `raw` and derive its metrics under the default policy.
pub fn compute_metrics(raw: RawItemInput) -> DomainResult<InventoryItem> {
    compute_metrics_with(raw, &MetricsPolicy::default())
}

/// Validate `raw` and derive its metrics under `policy`.
///
/// Nothing is computed when validation fails.
pub fn compute_metrics_with(raw: RawItemInput, policy: &MetricsPolicy) -> DomainResult<InventoryItem> {
    raw.validate(policy)?;

    let input = RawItemInput {
        item_name: raw.item_name.trim().to_string(),
        ..raw
    };
    let metrics = DerivedMetrics::derive(&input, policy)?;

    Ok(InventoryItem {
        input,
        metrics: Some(metrics),
    })
}
