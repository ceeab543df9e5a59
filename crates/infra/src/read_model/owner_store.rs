use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use stockpilot_core::OwnerId;

/// Owner-isolated key/value store abstraction for item records.
///
/// Every operation is scoped by owner; a key stored for one owner is invisible
/// to every other owner.
pub trait OwnerStore<K, V>: Send + Sync {
    fn get(&self, owner_id: OwnerId, key: &K) -> Option<V>;
    fn upsert(&self, owner_id: OwnerId, key: K, value: V);
    /// Remove and return the record, if the owner has one under `key`.
    fn remove(&self, owner_id: OwnerId, key: &K) -> Option<V>;
    fn list(&self, owner_id: OwnerId) -> Vec<V>;
}

impl<K, V, S> OwnerStore<K, V> for Arc<S>
where
    S: OwnerStore<K, V> + ?Sized,
{
    fn get(&self, owner_id: OwnerId, key: &K) -> Option<V> {
        (**self).get(owner_id, key)
    }

    fn upsert(&self, owner_id: OwnerId, key: K, value: V) {
        (**self).upsert(owner_id, key, value)
    }

    fn remove(&self, owner_id: OwnerId, key: &K) -> Option<V> {
        (**self).remove(owner_id, key)
    }

    fn list(&self, owner_id: OwnerId) -> Vec<V> {
        (**self).list(owner_id)
    }
}

/// In-memory owner-isolated store for tests/dev.
#[derive(Debug)]
pub struct InMemoryOwnerStore<K, V> {
    inner: RwLock<HashMap<(OwnerId, K), V>>,
}

impl<K, V> InMemoryOwnerStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryOwnerStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OwnerStore<K, V> for InMemoryOwnerStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, owner_id: OwnerId, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(&(owner_id, key.clone())).cloned()
    }

    fn upsert(&self, owner_id: OwnerId, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert((owner_id, key), value);
        }
    }

    fn remove(&self, owner_id: OwnerId, key: &K) -> Option<V> {
        let mut map = self.inner.write().ok()?;
        map.remove(&(owner_id, key.clone()))
    }

    fn list(&self, owner_id: OwnerId) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        map.iter()
            .filter_map(|((o, _k), v)| if *o == owner_id { Some(v.clone()) } else { None })
            .collect()
    }
}
