//! In-memory stores: striped per-key versioned storage and a TTL key-value
//! store with set-if-absent semantics.
//!
//! All mutations to a single entity are serialized by its stripe lock, so a
//! compare-and-set on the version field inside [`VersionedStore::update`] is
//! atomic. There is no global lock and no cross-entity ordering.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::error::{DomainError, DomainResult};

const STRIPE_COUNT: usize = 16;

/// Striped hash map keyed by entity id. Entities are stored by value and
/// cloned out, so readers never hold a lock across a suspension point.
pub struct VersionedStore<T> {
    stripes: Vec<Mutex<HashMap<String, T>>>,
}

impl<T: Clone> VersionedStore<T> {
    pub fn new() -> Self {
        Self {
            stripes: (0..STRIPE_COUNT).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }

    fn stripe(&self, key: &str) -> &Mutex<HashMap<String, T>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.stripes[(hasher.finish() as usize) % self.stripes.len()]
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.stripe(key).lock().get(key).cloned()
    }

    /// Insert a new entity. Returns `false` when the key already exists.
    pub fn insert(&self, key: &str, value: T) -> bool {
        let mut stripe = self.stripe(key).lock();
        if stripe.contains_key(key) {
            return false;
        }
        stripe.insert(key.to_string(), value);
        true
    }

    /// Run a mutation under the entity's stripe lock. The closure performs
    /// the version check and returns the updated snapshot; a missing key
    /// yields `NOT_FOUND` for `entity`.
    pub fn update<R>(
        &self,
        key: &str,
        entity: &str,
        mutate: impl FnOnce(&mut T) -> DomainResult<R>,
    ) -> DomainResult<R> {
        let mut stripe = self.stripe(key).lock();
        match stripe.get_mut(key) {
            Some(value) => mutate(value),
            None => Err(DomainError::not_found(entity, key)),
        }
    }

    pub fn values(&self) -> Vec<T> {
        self.stripes
            .iter()
            .flat_map(|stripe| stripe.lock().values().cloned().collect::<Vec<_>>())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.stripes.iter().map(|stripe| stripe.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for VersionedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct TtlEntry {
    value: String,
    expires_at: Instant,
}

/// Key-value store with per-entry TTL and atomic set-if-absent, the shape the
/// workflow idempotency layer expects from an external store. Expired entries
/// count as absent and are reaped lazily on access.
#[derive(Default)]
pub struct TtlStore {
    entries: DashMap<String, TtlEntry>,
}

impl TtlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically store `value` under `key` unless a live entry exists.
    /// Returns `true` when the value was written.
    pub fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let entry = TtlEntry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) if occupied.get().expires_at <= Instant::now() => {
                occupied.insert(entry);
                true
            }
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Some(entry.value.clone());
            }
        }
        // Reap after the read guard is dropped.
        self.entries.remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        None
    }
}
