//! Persisted Order Store
//!
//! Key-value access to saved orders plus the three writes the application
//! performs: commit after a reorder, prune after completion, append after
//! creation. Every write replaces the whole entry.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::error::OrderStoreError;
use crate::view::ViewIdentity;

/// Storage backend for persisted orders
pub trait OrderStore {
    /// Saved ids for `key`; empty when nothing (readable) is stored
    fn get(&self, key: &str) -> Vec<String>;

    /// Replace the saved ids for `key`
    fn set(&self, key: &str, ids: &[String]) -> Result<(), OrderStoreError>;
}

/// In-memory store for tests and native callers
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with a saved order
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderStore for MemoryOrderStore {
    fn get(&self, key: &str) -> Vec<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
            .unwrap_or_default()
    }

    fn set(&self, key: &str, ids: &[String]) -> Result<(), OrderStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| OrderStoreError::Write(e.to_string()))?;
        entries.insert(key.to_string(), ids.to_vec());
        Ok(())
    }
}

fn dedup(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Saved order for `view`
pub fn load_order<S: OrderStore + ?Sized>(store: &S, view: &ViewIdentity) -> Vec<String> {
    store.get(&view.storage_key())
}

/// Persist the full order shown on screen after a reorder
pub fn commit_order<S: OrderStore + ?Sized>(
    store: &S,
    view: &ViewIdentity,
    ids: &[String],
) -> Result<(), OrderStoreError> {
    store.set(&view.storage_key(), &dedup(ids.iter().cloned()))
}

/// Drop `id` from the saved order, keeping the others in place
pub fn prune_id<S: OrderStore + ?Sized>(
    store: &S,
    view: &ViewIdentity,
    id: &str,
) -> Result<(), OrderStoreError> {
    let key = view.storage_key();
    let remaining: Vec<String> = store.get(&key).into_iter().filter(|x| x != id).collect();
    store.set(&key, &remaining)
}

/// Persist `displayed` followed by a newly created `id`
pub fn append_id<S: OrderStore + ?Sized>(
    store: &S,
    view: &ViewIdentity,
    displayed: &[String],
    id: &str,
) -> Result<(), OrderStoreError> {
    let ids = dedup(displayed.iter().cloned().chain(std::iter::once(id.to_string())));
    store.set(&view.storage_key(), &ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewMode;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_key_reads_empty() {
        let store = MemoryOrderStore::new();
        assert!(load_order(&store, &ViewIdentity::label("home")).is_empty());
    }

    #[test]
    fn test_commit_is_total_rewrite() {
        let store = MemoryOrderStore::new();
        let view = ViewIdentity::label("home");
        commit_order(&store, &view, &ids(&["a", "b", "c", "stale"])).unwrap();
        commit_order(&store, &view, &ids(&["c", "a", "b"])).unwrap();
        assert_eq!(load_order(&store, &view), ids(&["c", "a", "b"]));
    }

    #[test]
    fn test_commit_drops_duplicates() {
        let store = MemoryOrderStore::new();
        let view = ViewIdentity::label("home");
        commit_order(&store, &view, &ids(&["a", "b", "a"])).unwrap();
        assert_eq!(load_order(&store, &view), ids(&["a", "b"]));
    }

    #[test]
    fn test_prune_keeps_relative_order() {
        let store = MemoryOrderStore::new();
        let view = ViewIdentity::label("home");
        commit_order(&store, &view, &ids(&["d", "b", "a", "c"])).unwrap();
        prune_id(&store, &view, "b").unwrap();
        assert_eq!(load_order(&store, &view), ids(&["d", "a", "c"]));
    }

    #[test]
    fn test_prune_only_touches_current_view() {
        let store = MemoryOrderStore::new();
        let home = ViewIdentity::label("home");
        let project = ViewIdentity::new(ViewMode::Project, "7");
        commit_order(&store, &home, &ids(&["a", "b"])).unwrap();
        commit_order(&store, &project, &ids(&["b", "a"])).unwrap();
        prune_id(&store, &home, "a").unwrap();
        assert_eq!(load_order(&store, &home), ids(&["b"]));
        assert_eq!(load_order(&store, &project), ids(&["b", "a"]));
    }

    #[test]
    fn test_append_puts_new_id_last() {
        let store = MemoryOrderStore::new();
        let view = ViewIdentity::label("home");
        append_id(&store, &view, &ids(&["b", "a"]), "z").unwrap();
        assert_eq!(load_order(&store, &view), ids(&["b", "a", "z"]));

        append_id(&store, &view, &ids(&["b", "z", "a"]), "z").unwrap();
        assert_eq!(load_order(&store, &view), ids(&["b", "z", "a"]));
    }
}
