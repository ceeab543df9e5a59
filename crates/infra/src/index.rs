//! Caller-owned lookup of fetched items by identifier.
//!
//! Edit/delete flows look an item up by the identifier they were handed. The
//! index is built from one fetched collection and replaced wholesale on the
//! next fetch; it is never shared process state.

use std::collections::HashMap;

use stockpilot_core::{DomainError, DomainResult, ItemId};

use crate::catalog::StoredItem;

#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    items: HashMap<ItemId, StoredItem>,
}

impl ItemIndex {
    pub fn rebuild<I>(items: I) -> Self
    where
        I: IntoIterator<Item = StoredItem>,
    {
        Self {
            items: items.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    /// Drop the current contents and index `items` instead.
    pub fn refresh<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = StoredItem>,
    {
        *self = Self::rebuild(items);
    }

    pub fn get(&self, id: &ItemId) -> Option<&StoredItem> {
        self.items.get(id)
    }

    /// Look up an identifier received as text.
    pub fn lookup(&self, raw_id: &str) -> DomainResult<&StoredItem> {
        let id: ItemId = raw_id.parse()?;
        self.get(&id).ok_or_else(DomainError::not_found)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredItem> {
        self.items.values()
    }
}

impl FromIterator<StoredItem> for ItemIndex {
    fn from_iter<T: IntoIterator<Item = StoredItem>>(iter: T) -> Self {
        Self::rebuild(iter)
    }
}
