//! Read-only snapshots of the store: root state and transition table.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::fingerprint::TaggedValue;
use crate::module::Transition;

/// The modules of one partition, keyed by module id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    modules: BTreeMap<String, Arc<TaggedValue>>,
}

impl Partition {
    pub fn get(&self, id: &str) -> Option<&Arc<TaggedValue>> {
        self.modules.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<TaggedValue>)> {
        self.modules.iter().map(|(id, state)| (id.as_str(), state))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub(crate) fn insert(&mut self, id: String, state: Arc<TaggedValue>) {
        self.modules.insert(id, state);
    }

    pub(crate) fn remove(&mut self, id: &str) -> bool {
        self.modules.remove(id).is_some()
    }

    fn to_value(&self) -> Value {
        Value::Object(
            self.modules
                .iter()
                .map(|(id, state)| (id.clone(), state.to_value()))
                .collect::<Map<String, Value>>(),
        )
    }
}

impl Serialize for Partition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.modules.iter().map(|(id, state)| (id, &**state)))
    }
}

/// Immutable snapshot of every partition and its module states.
///
/// Cloning is cheap. Snapshots never change after they are handed out: a
/// dispatch builds a new root that shares every untouched partition and
/// module state with the previous one, which [`RootState::ptr_eq`] and
/// `Arc::ptr_eq` on the accessors make observable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootState {
    partitions: Arc<BTreeMap<String, Arc<Partition>>>,
}

impl RootState {
    pub fn partition(&self, partition_key: &str) -> Option<&Arc<Partition>> {
        self.partitions.get(partition_key)
    }

    /// Tagged state of module `id` in `partition_key`.
    pub fn module(&self, partition_key: &str, id: &str) -> Option<&Arc<TaggedValue>> {
        self.partitions.get(partition_key)?.get(id)
    }

    pub fn partition_keys(&self) -> impl Iterator<Item = &str> {
        self.partitions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Partition>)> {
        self.partitions.iter().map(|(key, partition)| (key.as_str(), partition))
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// True when both snapshots are the same root, not merely equal.
    pub fn ptr_eq(&self, other: &RootState) -> bool {
        Arc::ptr_eq(&self.partitions, &other.partitions)
    }

    /// Plain JSON view `{partition: {id: state}}` with tags stripped.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.partitions
                .iter()
                .map(|(key, partition)| (key.clone(), partition.to_value()))
                .collect::<Map<String, Value>>(),
        )
    }

    /// Copy-on-write access to the partition map.
    ///
    /// Clones the map only when another snapshot still shares it.
    pub(crate) fn partitions_mut(&mut self) -> &mut BTreeMap<String, Arc<Partition>> {
        Arc::make_mut(&mut self.partitions)
    }
}

impl Serialize for RootState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.partitions
                .iter()
                .map(|(key, partition)| (key, &**partition)),
        )
    }
}

/// Snapshot of the module id → transition mapping.
#[derive(Clone, Default)]
pub struct TransitionTable {
    entries: Arc<BTreeMap<String, Arc<dyn Transition>>>,
}

impl TransitionTable {
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Transition>> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut BTreeMap<String, Arc<dyn Transition>> {
        Arc::make_mut(&mut self.entries)
    }
}

impl fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
