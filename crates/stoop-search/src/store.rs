//! Device-local key-value state.
//!
//! Recently-viewed listings and the saved-page tab preference live in a
//! small string store owned by the host shell (on the web that was the
//! browser's local storage). The engine itself never touches this; it
//! belongs to the surrounding pages.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const RECENT_KEY: &str = "pm_recent";
const SAVED_TAB_KEY: &str = "pm_saved_tab";

/// Most recently-viewed entries kept.
const RECENT_CAP: usize = 20;

/// String key-value storage provided by the host shell.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store. The default for tests and headless use.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// One remembered listing visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub id: i64,
    pub title: String,
    pub price_cents: i64,
}

/// Recently-viewed listings, newest first.
pub struct RecentlyViewed {
    store: Arc<dyn KeyValueStore>,
}

impl RecentlyViewed {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored entries. Unreadable data counts as empty.
    pub fn list(&self) -> Vec<RecentEntry> {
        self.store
            .get(RECENT_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Remember a visit. Moves an already-known listing to the front.
    pub fn record(&self, entry: RecentEntry) {
        let mut entries = self.list();
        entries.retain(|existing| existing.id != entry.id);
        entries.insert(0, entry);
        entries.truncate(RECENT_CAP);
        self.save(&entries);
    }

    /// Drop entries whose listings no longer resolve on the server.
    /// Returns what survived.
    pub fn retain_ids(&self, valid: &[i64]) -> Vec<RecentEntry> {
        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|entry| valid.contains(&entry.id));
        if entries.len() != before {
            self.save(&entries);
        }
        entries
    }

    /// Forget everything.
    pub fn clear(&self) {
        self.store.remove(RECENT_KEY);
    }

    fn save(&self, entries: &[RecentEntry]) {
        match serde_json::to_string(entries) {
            Ok(raw) => self.store.set(RECENT_KEY, &raw),
            Err(err) => tracing::warn!("could not encode recent entries: {}", err),
        }
    }
}

/// Which tab the saved page was left on.
pub fn saved_tab(store: &dyn KeyValueStore) -> Option<String> {
    store.get(SAVED_TAB_KEY)
}

/// Remember the saved page tab.
pub fn set_saved_tab(store: &dyn KeyValueStore, tab: &str) {
    store.set(SAVED_TAB_KEY, tab);
}
