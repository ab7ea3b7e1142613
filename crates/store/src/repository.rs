use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use crate::StoreError;

/// Keyed storage abstraction the typed stores are built on.
///
/// The in-memory implementation below is the only one in this workspace; the
/// trait exists so a persistent backend can replace it without touching the
/// typed stores or the handlers above them.
pub trait Repository<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;

    /// All records, in no particular order; typed stores sort.
    fn list(&self) -> Vec<V>;

    /// Fails with [`StoreError::Conflict`] when the key is already present.
    fn insert(&self, key: K, value: V) -> Result<(), StoreError>;

    /// Mutate an existing record under the write lock, returning the updated
    /// copy. Fails with [`StoreError::NotFound`] when the key is absent.
    fn update(&self, key: &K, apply: &mut dyn FnMut(&mut V)) -> Result<V, StoreError>;

    /// Remove and return a record.
    fn remove(&self, key: &K) -> Result<V, StoreError>;
}

impl<K, V, S> Repository<K, V> for Arc<S>
where
    S: Repository<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }

    fn insert(&self, key: K, value: V) -> Result<(), StoreError> {
        (**self).insert(key, value)
    }

    fn update(&self, key: &K, apply: &mut dyn FnMut(&mut V)) -> Result<V, StoreError> {
        (**self).update(key, apply)
    }

    fn remove(&self, key: &K) -> Result<V, StoreError> {
        (**self).remove(key)
    }
}

/// In-memory repository backed by a `RwLock<HashMap>`.
///
/// Contents do not survive a restart. A poisoned lock still yields the map
/// (the data is coherent; only the panicking writer's request died).
#[derive(Debug)]
pub struct InMemoryRepository<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryRepository<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryRepository<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Repository<K, V> for InMemoryRepository<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(key).cloned()
    }

    fn list(&self) -> Vec<V> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.values().cloned().collect()
    }

    fn insert(&self, key: K, value: V) -> Result<(), StoreError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(&key) {
            return Err(StoreError::Conflict("record already exists".to_string()));
        }
        map.insert(key, value);
        Ok(())
    }

    fn update(&self, key: &K, apply: &mut dyn FnMut(&mut V)) -> Result<V, StoreError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let value = map.get_mut(key).ok_or(StoreError::NotFound)?;
        apply(value);
        Ok(value.clone())
    }

    fn remove(&self, key: &K) -> Result<V, StoreError> {
        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(key).ok_or(StoreError::NotFound)
    }
}
