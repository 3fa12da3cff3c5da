//! In-memory record collection persisted under a single store key

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use super::store::KeyValueStore;
use crate::error::AppResult;

/// A record addressable by an opaque string id
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> &str;
}

#[derive(Clone)]
pub struct Collection<T> {
    key: String,
    store: Arc<dyn KeyValueStore>,
    items: Arc<RwLock<Vec<T>>>,
}

impl<T: Record> Collection<T> {
    /// Load the collection stored under `key`.
    ///
    /// A missing key is an empty collection. An unreadable value is logged and
    /// treated as empty as well.
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> AppResult<Self> {
        let key = key.into();
        let items = match store.get(&key)? {
            None => Vec::new(),
            Some(bytes) => match serde_json::from_slice::<Vec<T>>(&bytes) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable collection {}: {}", key, e);
                    Vec::new()
                }
            },
        };
        tracing::debug!("Loaded {} records from {}", items.len(), key);

        Ok(Self {
            key,
            store,
            items: Arc::new(RwLock::new(items)),
        })
    }

    /// Snapshot of every record, in insertion order
    pub async fn all(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub async fn find(&self, id: &str) -> Option<T> {
        self.items.read().await.iter().find(|r| r.id() == id).cloned()
    }

    pub async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.items
            .read()
            .await
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    /// Append a record and return the updated collection
    pub async fn insert(&self, item: T) -> AppResult<Vec<T>> {
        self.mutate(|items| items.push(item)).await
    }

    /// Apply `f` to the record with `id`; returns the updated record, or None if absent
    pub async fn update<F>(&self, id: &str, f: F) -> AppResult<Option<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut items = self.items.write().await;
        let Some(pos) = items.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let mut next = items.clone();
        f(&mut next[pos]);
        self.persist(&next)?;
        let updated = next[pos].clone();
        *items = next;
        Ok(Some(updated))
    }

    /// Remove the record with `id` and return the updated collection, or None if absent
    pub async fn remove(&self, id: &str) -> AppResult<Option<Vec<T>>> {
        let mut items = self.items.write().await;
        if !items.iter().any(|r| r.id() == id) {
            return Ok(None);
        }
        let next: Vec<T> = items.iter().filter(|r| r.id() != id).cloned().collect();
        self.persist(&next)?;
        *items = next.clone();
        Ok(Some(next))
    }

    /// Replace every record at once (used by import)
    pub async fn replace_all(&self, records: Vec<T>) -> AppResult<Vec<T>> {
        self.mutate(|items| *items = records).await
    }

    async fn mutate<F>(&self, f: F) -> AppResult<Vec<T>>
    where
        F: FnOnce(&mut Vec<T>),
    {
        let mut items = self.items.write().await;
        let mut next = items.clone();
        f(&mut next);
        self.persist(&next)?;
        *items = next.clone();
        Ok(next)
    }

    fn persist(&self, items: &[T]) -> AppResult<()> {
        let bytes = serde_json::to_vec(items)?;
        self.store.set(&self.key, &bytes)
    }
}
