//! Listener registry and subscription handles.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::module::non_empty;

use super::error::StoreError;
use super::state::RootState;
use super::Shared;

/// Callback invoked with `(previous, next)` root state after a dispatch.
pub type Listener = Arc<dyn Fn(&RootState, &RootState) + Send + Sync>;

/// Narrows a subscription to a partition, a module id, or both.
///
/// Empty strings count as absent, so `("h2", "")` is a partition-only filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub partition_key: Option<String>,
    pub id: Option<String>,
}

impl SubscriptionFilter {
    /// Every dispatch.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn partition(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: Some(partition_key.into()),
            id: None,
        }
    }

    pub fn module(id: impl Into<String>) -> Self {
        Self {
            partition_key: None,
            id: Some(id.into()),
        }
    }

    pub fn exact(partition_key: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            partition_key: Some(partition_key.into()),
            id: Some(id.into()),
        }
    }

    pub(crate) fn key(&self) -> SubscriptionKey {
        let partition_key = non_empty(self.partition_key.as_deref());
        let id = non_empty(self.id.as_deref());
        match (partition_key, id) {
            (None, None) => SubscriptionKey::All,
            (Some(p), None) => SubscriptionKey::Partition(p.to_string()),
            (None, Some(m)) => SubscriptionKey::Module(m.to_string()),
            (Some(p), Some(m)) => SubscriptionKey::Exact(p.to_string(), m.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum SubscriptionKey {
    All,
    Partition(String),
    Module(String),
    Exact(String, String),
}

/// Listener buckets keyed by subscription granularity.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    buckets: HashMap<SubscriptionKey, Vec<(u64, Listener)>>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn insert(&mut self, key: SubscriptionKey, listener: Listener) -> u64 {
        let listener_id = self.next_id;
        self.next_id += 1;
        self.buckets
            .entry(key)
            .or_default()
            .push((listener_id, listener));
        listener_id
    }

    /// Remove one listener. Returns false if it was already gone.
    pub fn remove(&mut self, key: &SubscriptionKey, listener_id: u64) -> bool {
        let Some(bucket) = self.buckets.get_mut(key) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|(id, _)| *id != listener_id);
        let removed = bucket.len() != before;
        if bucket.is_empty() {
            self.buckets.remove(key);
        }
        removed
    }

    /// Listeners interested in a dispatch to `(partition_key, id)`, in
    /// notification order: unfiltered, partition, module, exact.
    pub fn matching(&self, partition_key: &str, id: &str) -> Vec<Listener> {
        let keys = [
            SubscriptionKey::All,
            SubscriptionKey::Partition(partition_key.to_string()),
            SubscriptionKey::Module(id.to_string()),
            SubscriptionKey::Exact(partition_key.to_string(), id.to_string()),
        ];
        keys.iter()
            .filter_map(|key| self.buckets.get(key))
            .flat_map(|bucket| bucket.iter().map(|(_, listener)| Arc::clone(listener)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle returned by [`crate::Store::subscribe`].
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    store: Weak<Shared>,
    key: SubscriptionKey,
    listener_id: u64,
}

impl Subscription {
    pub(crate) fn new(store: Weak<Shared>, key: SubscriptionKey, listener_id: u64) -> Self {
        Self {
            store,
            key,
            listener_id,
        }
    }

    /// Remove the listener from the store.
    ///
    /// Calling it again, or after the store is gone, does nothing.
    ///
    /// # Errors
    /// Returns [`StoreError::UnsubscribeDuringDispatch`] when called from inside
    /// a transition.
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        let Some(shared) = self.store.upgrade() else {
            return Ok(());
        };
        let guard = shared.lock();
        let mut core = guard.borrow_mut();
        if core.dispatching {
            return Err(StoreError::UnsubscribeDuringDispatch);
        }

        if core.listeners.remove(&self.key, self.listener_id) {
            tracing::trace!(key = ?self.key, "Listener removed");
        }
        Ok(())
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("listener_id", &self.listener_id)
            .finish()
    }
}
