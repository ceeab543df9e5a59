//! Tunable constants behind the metrics and aggregation rules.
//!
//! Every threshold the engine compares against lives here, both as a `const`
//! and as a field of [`MetricsPolicy`] / [`ListingPolicy`], so the calculation
//! code never embeds a magic number.

use serde::{Deserialize, Serialize};

use stockpilot_core::{DomainError, DomainResult};

/// Risk scores strictly above this value are `Critical`.
pub const CRITICAL_RISK_THRESHOLD: f64 = 70.0;

/// Risk scores at or above this value (and not critical) are `Warning`.
pub const WARNING_RISK_THRESHOLD: f64 = 40.0;

/// Upper bound for a supplier lead time, in days.
pub const MAX_LEAD_TIME_DAYS: f64 = 365.0;

/// Multiplier turning a positive total variance into a projected monthly loss.
///
/// Business-rule assumption: variance accrues daily over a 30-day month. It is
/// not derived from any physical quantity.
pub const LOSS_PROJECTION_DAYS: f64 = 30.0;

/// Lower and upper bound of a risk score.
pub const MIN_RISK_SCORE: f64 = 0.0;
pub const MAX_RISK_SCORE: f64 = 100.0;

/// Page size used by listings when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Number of items a dashboard shows as "recent".
pub const RECENT_ITEMS_LIMIT: usize = 10;

pub const ENV_CRITICAL_ABOVE: &str = "STOCKPILOT_CRITICAL_ABOVE";
pub const ENV_WARNING_AT_OR_ABOVE: &str = "STOCKPILOT_WARNING_AT_OR_ABOVE";
pub const ENV_MAX_LEAD_TIME_DAYS: &str = "STOCKPILOT_MAX_LEAD_TIME_DAYS";
pub const ENV_LOSS_PROJECTION_DAYS: &str = "STOCKPILOT_LOSS_PROJECTION_DAYS";

/// Thresholds used by the metrics engine and the cost summary.
///
/// Deserialized policies are validated; a config that would disable a rule
/// (NaN bound, inverted thresholds) is refused.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PolicyConfig")]
pub struct MetricsPolicy {
    /// `riskScore > critical_above` → `Critical`.
    pub critical_above: f64,
    /// `riskScore >= warning_at_or_above` → `Warning` (unless critical).
    pub warning_at_or_above: f64,
    pub max_lead_time_days: f64,
    pub loss_projection_days: f64,
}

impl Default for MetricsPolicy {
    fn default() -> Self {
        Self {
            critical_above: CRITICAL_RISK_THRESHOLD,
            warning_at_or_above: WARNING_RISK_THRESHOLD,
            max_lead_time_days: MAX_LEAD_TIME_DAYS,
            loss_projection_days: LOSS_PROJECTION_DAYS,
        }
    }
}

/// Unvalidated policy as it appears in configuration.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PolicyConfig {
    critical_above: f64,
    warning_at_or_above: f64,
    max_lead_time_days: f64,
    loss_projection_days: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let policy = MetricsPolicy::default();
        Self {
            critical_above: policy.critical_above,
            warning_at_or_above: policy.warning_at_or_above,
            max_lead_time_days: policy.max_lead_time_days,
            loss_projection_days: policy.loss_projection_days,
        }
    }
}

impl TryFrom<PolicyConfig> for MetricsPolicy {
    type Error = DomainError;

    fn try_from(config: PolicyConfig) -> DomainResult<Self> {
        let policy = Self {
            critical_above: config.critical_above,
            warning_at_or_above: config.warning_at_or_above,
            max_lead_time_days: config.max_lead_time_days,
            loss_projection_days: config.loss_projection_days,
        };
        policy.validate()?;
        Ok(policy)
    }
}

impl MetricsPolicy {
    /// Load the policy from `STOCKPILOT_*` environment variables.
    ///
    /// Unset variables keep their defaults; unparsable ones are logged and
    /// ignored. The resulting policy is validated.
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`MetricsPolicy::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut policy = Self::default();
        override_f64(&lookup, ENV_CRITICAL_ABOVE, &mut policy.critical_above);
        override_f64(&lookup, ENV_WARNING_AT_OR_ABOVE, &mut policy.warning_at_or_above);
        override_f64(&lookup, ENV_MAX_LEAD_TIME_DAYS, &mut policy.max_lead_time_days);
        override_f64(&lookup, ENV_LOSS_PROJECTION_DAYS, &mut policy.loss_projection_days);
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            ("criticalAbove", self.critical_above),
            ("warningAtOrAbove", self.warning_at_or_above),
            ("maxLeadTimeDays", self.max_lead_time_days),
            ("lossProjectionDays", self.loss_projection_days),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DomainError::validation(format!("{name} must be a finite number")));
        }

        let score_range = MIN_RISK_SCORE..=MAX_RISK_SCORE;
        if !score_range.contains(&self.critical_above) || !score_range.contains(&self.warning_at_or_above) {
            return Err(DomainError::validation(
                "risk thresholds must lie between 0 and 100",
            ));
        }
        if self.warning_at_or_above > self.critical_above {
            return Err(DomainError::validation(
                "warning threshold cannot exceed the critical threshold",
            ));
        }
        if self.max_lead_time_days <= 0.0 {
            return Err(DomainError::validation("maxLeadTimeDays must be positive"));
        }
        if self.loss_projection_days <= 0.0 {
            return Err(DomainError::validation("lossProjectionDays must be positive"));
        }
        Ok(())
    }
}

/// Listing defaults used when a caller leaves paging unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingPolicy {
    pub default_page_size: usize,
    pub recent_items: usize,
}

impl Default for ListingPolicy {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            recent_items: RECENT_ITEMS_LIMIT,
        }
    }
}

fn override_f64<F>(lookup: &F, key: &str, slot: &mut f64)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<f64>() {
        Ok(value) => *slot = value,
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring unparsable policy override");
        }
    }
}
