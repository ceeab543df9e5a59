//! Owner-scoped item catalog.
//!
//! The catalog is the caller the metrics engine expects: it takes raw input
//! for one item, runs it through the engine, keeps the computed record under
//! an owner, and hands owner-scoped collections to the aggregation service.
//!
//! ```text
//! RawItemInput ──compute_metrics──▶ InventoryItem ──▶ StoredItem ──▶ OwnerStore
//!                                                                   │
//!            CostSummary / DashboardSummary / alerts ◀──aggregation─┘
//! ```
//!
//! Updates are full re-submissions of the raw attributes; every derived field
//! is recomputed. Ownership is enforced here: an item owned by someone else is
//! reported as not found.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stockpilot_core::{DomainError, DomainResult, ItemId, OwnerId};
use stockpilot_inventory::{
    CostComparison, CostSummary, DashboardSummary, InventoryItem, ListingPolicy, MetricsPolicy,
    RawItemInput, ReorderAlert, RiskDistribution, aggregation, alerts, compute_metrics_with,
};

use crate::index::ItemIndex;
use crate::read_model::OwnerStore;

/// A computed item as kept by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredItem {
    pub id: ItemId,
    pub owner_id: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub item: InventoryItem,
}

impl AsRef<InventoryItem> for StoredItem {
    fn as_ref(&self) -> &InventoryItem {
        &self.item
    }
}

/// Requested page. Missing or zero values fall back to page 1 and the
/// listing policy's default page size.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Item catalog over an owner-isolated store.
#[derive(Debug)]
pub struct ItemCatalog<S>
where
    S: OwnerStore<ItemId, StoredItem>,
{
    store: S,
    metrics: MetricsPolicy,
    listing: ListingPolicy,
}

impl<S> ItemCatalog<S>
where
    S: OwnerStore<ItemId, StoredItem>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            metrics: MetricsPolicy::default(),
            listing: ListingPolicy::default(),
        }
    }

    /// Catalog with explicit policies. The metrics policy is validated first.
    pub fn with_policies(
        store: S,
        metrics: MetricsPolicy,
        listing: ListingPolicy,
    ) -> DomainResult<Self> {
        metrics.validate()?;
        Ok(Self {
            store,
            metrics,
            listing,
        })
    }

    /// Compute and store a new item for `owner_id`.
    pub fn create(
        &self,
        owner_id: OwnerId,
        raw: RawItemInput,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<StoredItem> {
        let item = self.compute(owner_id, raw)?;
        let stored = StoredItem {
            id: ItemId::new(),
            owner_id,
            created_at: occurred_at,
            updated_at: occurred_at,
            item,
        };
        self.store.upsert(owner_id, stored.id, stored.clone());

        info!(
            owner_id = %owner_id,
            item_id = %stored.id,
            risk_category = %category_of(&stored),
            "inventory item created"
        );
        Ok(stored)
    }

    /// Replace every raw attribute of an existing item and recompute it.
    pub fn update(
        &self,
        owner_id: OwnerId,
        item_id: ItemId,
        raw: RawItemInput,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<StoredItem> {
        let existing = self.get(owner_id, item_id)?;
        let item = self.compute(owner_id, raw)?;
        let stored = StoredItem {
            updated_at: occurred_at,
            item,
            ..existing
        };
        self.store.upsert(owner_id, item_id, stored.clone());

        info!(
            owner_id = %owner_id,
            item_id = %item_id,
            risk_category = %category_of(&stored),
            "inventory item updated"
        );
        Ok(stored)
    }

    pub fn delete(&self, owner_id: OwnerId, item_id: ItemId) -> DomainResult<StoredItem> {
        let removed = self.store.remove(owner_id, &item_id).ok_or_else(|| {
            debug!(owner_id = %owner_id, item_id = %item_id, "delete of unknown item");
            DomainError::not_found()
        })?;
        info!(owner_id = %owner_id, item_id = %item_id, "inventory item deleted");
        Ok(removed)
    }

    pub fn get(&self, owner_id: OwnerId, item_id: ItemId) -> DomainResult<StoredItem> {
        self.store
            .get(owner_id, &item_id)
            .ok_or_else(DomainError::not_found)
    }

    /// Newest-first page of the owner's items.
    pub fn list(&self, owner_id: OwnerId, request: PageRequest) -> Page<StoredItem> {
        let page = request.page.filter(|p| *p > 0).unwrap_or(1);
        let limit = request
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(self.listing.default_page_size)
            .max(1);

        let all = self.newest_first(owner_id);
        let total = all.len();
        let skip = (page - 1).saturating_mul(limit);
        let items = all.into_iter().skip(skip).take(limit).collect();

        Page {
            items,
            pagination: Pagination {
                page,
                limit,
                total,
                pages: total.div_ceil(limit),
            },
        }
    }

    /// Cost/variance summary with projected monthly loss.
    pub fn summary(&self, owner_id: OwnerId) -> DomainResult<CostSummary> {
        aggregation::cost_summary_with(&self.store.list(owner_id), &self.metrics)
    }

    /// Totals plus the most recently created items.
    pub fn dashboard(&self, owner_id: OwnerId) -> DomainResult<DashboardSummary<StoredItem>> {
        aggregation::dashboard(&self.newest_first(owner_id), self.listing.recent_items)
    }

    pub fn risk_distribution(&self, owner_id: OwnerId) -> DomainResult<RiskDistribution> {
        aggregation::risk_distribution(&self.store.list(owner_id))
    }

    pub fn cost_comparison(&self, owner_id: OwnerId) -> DomainResult<Vec<CostComparison>> {
        aggregation::cost_comparison(&self.newest_first(owner_id))
    }

    /// Alerts for the owner's warning and critical items, most severe first.
    pub fn reorder_alerts(&self, owner_id: OwnerId) -> DomainResult<Vec<ReorderAlert>> {
        alerts::actionable_alerts(&self.newest_first(owner_id))
    }

    /// Fetch the owner's items once and index them by identifier.
    pub fn index(&self, owner_id: OwnerId) -> ItemIndex {
        ItemIndex::rebuild(self.store.list(owner_id))
    }

    fn compute(&self, owner_id: OwnerId, raw: RawItemInput) -> DomainResult<InventoryItem> {
        compute_metrics_with(raw, &self.metrics).inspect_err(|e| {
            debug!(owner_id = %owner_id, reason = e.reason(), "rejected inventory input");
        })
    }

    fn newest_first(&self, owner_id: OwnerId) -> Vec<StoredItem> {
        let mut items = self.store.list(owner_id);
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        items
    }
}

fn category_of(stored: &StoredItem) -> &'static str {
    stored
        .item
        .metrics()
        .map(|m| m.risk_category.as_str())
        .unwrap_or("uncomputed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use stockpilot_inventory::RiskCategory;

    use crate::read_model::InMemoryOwnerStore;

    fn catalog() -> ItemCatalog<InMemoryOwnerStore<ItemId, StoredItem>> {
        ItemCatalog::new(InMemoryOwnerStore::new())
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn raw(name: &str, current_stock: f64) -> RawItemInput {
        RawItemInput {
            item_name: name.to_string(),
            planned_qty: 10.0,
            planned_rate: 5.0,
            actual_qty: 12.0,
            actual_rate: 5.0,
            current_stock,
            daily_consumption: 4.0,
            lead_time: 10.0,
            safety_stock: 15.0,
        }
    }

    #[test]
    fn invalid_policies_are_refused() {
        let with = |metrics: MetricsPolicy| {
            let store: InMemoryOwnerStore<ItemId, StoredItem> = InMemoryOwnerStore::new();
            ItemCatalog::with_policies(store, metrics, ListingPolicy::default()).err()
        };

        let inverted = MetricsPolicy {
            critical_above: 30.0,
            warning_at_or_above: 60.0,
            ..MetricsPolicy::default()
        };
        assert!(matches!(with(inverted), Some(DomainError::Validation(_))));

        let no_lead_time_cap = MetricsPolicy {
            max_lead_time_days: f64::NAN,
            ..MetricsPolicy::default()
        };
        assert!(matches!(with(no_lead_time_cap), Some(DomainError::Validation(_))));

        assert!(with(MetricsPolicy::default()).is_none());
    }

    #[test]
    fn create_stores_the_computed_item() {
        let catalog = catalog();
        let owner = OwnerId::new();

        let stored = catalog.create(owner, raw("  flux ", 20.0), t0()).unwrap();
        assert_eq!(stored.owner_id, owner);
        assert_eq!(stored.created_at, stored.updated_at);
        assert_eq!(stored.item.item_name(), "flux");
        assert_eq!(stored.item.metrics().unwrap().reorder_qty, 35.0);

        assert_eq!(catalog.get(owner, stored.id).unwrap(), stored);
    }

    #[test]
    fn rejected_input_stores_nothing() {
        let catalog = catalog();
        let owner = OwnerId::new();

        let err = catalog
            .create(owner, RawItemInput { lead_time: 400.0, ..raw("flux", 20.0) }, t0())
            .unwrap_err();
        assert_eq!(err, DomainError::validation("Lead time cannot exceed 365 days"));
        assert_eq!(catalog.list(owner, PageRequest::default()).pagination.total, 0);
    }

    #[test]
    fn update_recomputes_and_keeps_creation_time() {
        let catalog = catalog();
        let owner = OwnerId::new();
        let created = catalog.create(owner, raw("flux", 20.0), t0()).unwrap();

        let later = t0() + Duration::hours(2);
        let updated = catalog.update(owner, created.id, raw("flux", 0.0), later).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, t0());
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.item.metrics().unwrap().risk_category, RiskCategory::Critical);
        assert_eq!(catalog.get(owner, created.id).unwrap(), updated);
    }

    #[test]
    fn failed_update_leaves_the_item_untouched() {
        let catalog = catalog();
        let owner = OwnerId::new();
        let created = catalog.create(owner, raw("flux", 20.0), t0()).unwrap();

        let err = catalog
            .update(owner, created.id, raw("   ", 20.0), t0())
            .unwrap_err();
        assert_eq!(err, DomainError::validation("Item name is required"));
        assert_eq!(catalog.get(owner, created.id).unwrap(), created);
    }

    #[test]
    fn other_owners_cannot_see_update_or_delete_items() {
        let catalog = catalog();
        let owner = OwnerId::new();
        let intruder = OwnerId::new();
        let created = catalog.create(owner, raw("flux", 20.0), t0()).unwrap();

        assert_eq!(catalog.get(intruder, created.id), Err(DomainError::NotFound));
        assert_eq!(
            catalog.update(intruder, created.id, raw("flux", 1.0), t0()),
            Err(DomainError::NotFound)
        );
        assert_eq!(catalog.delete(intruder, created.id), Err(DomainError::NotFound));
        assert!(catalog.get(owner, created.id).is_ok());
    }

    #[test]
    fn delete_removes_the_item() {
        let catalog = catalog();
        let owner = OwnerId::new();
        let created = catalog.create(owner, raw("flux", 20.0), t0()).unwrap();

        assert_eq!(catalog.delete(owner, created.id).unwrap(), created);
        assert_eq!(catalog.get(owner, created.id), Err(DomainError::NotFound));
        assert_eq!(catalog.delete(owner, created.id), Err(DomainError::NotFound));
    }

    #[test]
    fn list_pages_newest_first() {
        let catalog = catalog();
        let owner = OwnerId::new();
        for i in 0..5 {
            catalog
                .create(owner, raw(&format!("item-{i}"), 20.0), t0() + Duration::minutes(i))
                .unwrap();
        }

        let first = catalog.list(owner, PageRequest::new(1, 2));
        let names: Vec<&str> = first.items.iter().map(|s| s.item.item_name()).collect();
        assert_eq!(names, ["item-4", "item-3"]);
        assert_eq!(
            first.pagination,
            Pagination { page: 1, limit: 2, total: 5, pages: 3 }
        );

        let last = catalog.list(owner, PageRequest::new(3, 2));
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].item.item_name(), "item-0");

        let beyond = catalog.list(owner, PageRequest::new(9, 2));
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn list_defaults_missing_or_zero_paging() {
        let catalog = catalog();
        let owner = OwnerId::new();
        catalog.create(owner, raw("flux", 20.0), t0()).unwrap();

        let page = catalog.list(owner, PageRequest { page: Some(0), limit: None });
        assert_eq!(page.pagination, Pagination { page: 1, limit: 50, total: 1, pages: 1 });

        let empty = catalog.list(OwnerId::new(), PageRequest::default());
        assert_eq!(empty.pagination.pages, 0);
    }

    #[test]
    fn dashboard_shows_the_ten_newest() {
        let catalog = catalog();
        let owner = OwnerId::new();
        for i in 0..12 {
            catalog
                .create(owner, raw(&format!("item-{i}"), 20.0), t0() + Duration::minutes(i))
                .unwrap();
        }

        let dash = catalog.dashboard(owner).unwrap();
        assert_eq!(dash.recent_items.len(), 10);
        assert_eq!(dash.recent_items[0].item.item_name(), "item-11");
        assert_eq!(dash.summary.total_planned_cost, 12.0 * 50.0);
    }
}
