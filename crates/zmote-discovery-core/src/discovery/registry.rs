//! Thread-safe store of discovered zmotes, keyed by uuid.
//!
//! The receiver task writes, any number of callers read. Reads always hand
//! out owned copies, so a snapshot is never affected by later upserts.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::types::{SeenZmote, Zmote};

#[derive(Debug, Clone)]
struct Entry {
    zmote: Zmote,
    first_seen: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    seen_at: Instant,
}

impl Entry {
    fn to_seen(&self) -> SeenZmote {
        SeenZmote {
            zmote: self.zmote.clone(),
            first_seen: self.first_seen,
            last_seen: self.last_seen,
        }
    }
}

/// Shared zmote registry.
///
/// Cloning is cheap and yields a handle to the same store.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<RwLock<HashMap<String, Entry>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are plain values, so a panic elsewhere cannot leave them
    // half-written; recover the guard instead of propagating the poison.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the entry for `zmote.uuid` with this record.
    ///
    /// Returns `true` when the uuid was not known before.
    pub fn upsert(&self, zmote: Zmote) -> bool {
        let now = Utc::now();
        let mut entries = self.write();

        let first_seen = entries
            .get(&zmote.uuid)
            .map(|existing| existing.first_seen)
            .unwrap_or(now);
        let is_new = !entries.contains_key(&zmote.uuid);

        entries.insert(
            zmote.uuid.clone(),
            Entry {
                zmote,
                first_seen,
                last_seen: now,
                seen_at: Instant::now(),
            },
        );

        is_new
    }

    /// Independent copy of every known record, keyed by uuid.
    pub fn snapshot(&self) -> HashMap<String, Zmote> {
        self.read()
            .iter()
            .map(|(uuid, entry)| (uuid.clone(), entry.zmote.clone()))
            .collect()
    }

    /// Every known record with its timestamps, sorted by uuid.
    pub fn entries(&self) -> Vec<SeenZmote> {
        let mut list: Vec<SeenZmote> = self.read().values().map(Entry::to_seen).collect();
        list.sort_by(|a, b| a.zmote.uuid.cmp(&b.zmote.uuid));
        list
    }

    /// Copy of a single record.
    pub fn get(&self, uuid: &str) -> Option<Zmote> {
        self.read().get(uuid).map(|entry| entry.zmote.clone())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop records whose last beacon is older than `ttl`.
    ///
    /// Returns the number of records removed.
    pub fn prune_older_than(&self, ttl: Duration) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        let now = Instant::now();
        entries.retain(|_, entry| now.duration_since(entry.seen_at) < ttl);
        before - entries.len()
    }

    #[cfg(test)]
    pub(crate) fn backdate(&self, uuid: &str, age: Duration) {
        if let Some(entry) = self.write().get_mut(uuid) {
            entry.seen_at = Instant::now() - age;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_zmote(uuid: &str, model: &str) -> Zmote {
        Zmote {
            uuid: uuid.to_string(),
            kind: "IR".to_string(),
            make: "Acme".to_string(),
            model: model.to_string(),
            revision: "1".to_string(),
            config_url: "http://192.168.1.50".to_string(),
            ip: "192.168.1.50".to_string(),
        }
    }

    #[test]
    fn test_upsert_replaces_whole_record() {
        let registry = Registry::new();

        assert!(registry.upsert(make_zmote("a1", "X1")));

        let mut second = make_zmote("a1", "X2");
        second.revision = "7".to_string();
        assert!(!registry.upsert(second.clone()));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a1"), Some(second));
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_upserts() {
        let registry = Registry::new();
        registry.upsert(make_zmote("a1", "X1"));

        let before = registry.snapshot();
        registry.upsert(make_zmote("a1", "X2"));
        registry.upsert(make_zmote("b2", "X1"));

        assert_eq!(before.len(), 1);
        assert_eq!(before["a1"].model, "X1");
        assert_eq!(registry.snapshot().len(), 2);
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.snapshot().is_empty());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_clone_shares_store() {
        let registry = Registry::new();
        let handle = registry.clone();

        handle.upsert(make_zmote("a1", "X1"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_entries_sorted_and_first_seen_kept() {
        let registry = Registry::new();
        registry.upsert(make_zmote("b", "X1"));
        registry.upsert(make_zmote("a", "X1"));

        let first = registry.entries();
        assert_eq!(first[0].zmote.uuid, "a");
        assert_eq!(first[1].zmote.uuid, "b");

        registry.upsert(make_zmote("a", "X2"));
        let second = registry.entries();
        assert_eq!(second[0].first_seen, first[0].first_seen);
        assert!(second[0].last_seen >= first[0].last_seen);
        assert_eq!(second[0].zmote.model, "X2");
    }

    #[test]
    fn test_prune_older_than() {
        let registry = Registry::new();
        registry.upsert(make_zmote("fresh", "X1"));
        registry.upsert(make_zmote("stale", "X1"));
        registry.backdate("stale", Duration::from_secs(120));

        let removed = registry.prune_older_than(Duration::from_secs(60));

        assert_eq!(removed, 1);
        assert!(registry.get("fresh").is_some());
        assert!(registry.get("stale").is_none());
    }

    #[test]
    fn test_concurrent_upserts_and_snapshots() {
        let registry = Registry::new();

        let writers: Vec<_> = (0..4)
            .map(|t| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        registry.upsert(make_zmote(&format!("dev-{}", i % 10), &format!("m{}", t)));
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            for (uuid, zmote) in registry.snapshot() {
                assert_eq!(uuid, zmote.uuid);
            }
        }

        for w in writers {
            w.join().unwrap();
        }

        assert_eq!(registry.len(), 10);
    }
}
