//! Partition map and transition table bookkeeping.

use std::sync::Arc;

use crate::fingerprint::{Fingerprinter, TaggedValue};
use crate::module::{ModuleInstance, ModuleSelector, Transition};

use super::error::StoreError;
use super::state::{RootState, TransitionTable};

/// Owns the current root state and the transition table.
///
/// Keeps both sides consistent: every module present in some partition has a
/// transition, every transition belongs to a module present in at least one
/// partition, and no partition is ever left empty.
#[derive(Debug, Default)]
pub(crate) struct ModuleRegistry {
    root: RootState,
    transitions: TransitionTable,
    fingerprinter: Fingerprinter,
}

impl ModuleRegistry {
    pub fn new(fingerprinter: Fingerprinter) -> Self {
        Self {
            fingerprinter,
            ..Self::default()
        }
    }

    pub fn root(&self) -> &RootState {
        &self.root
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn fingerprinter(&self) -> Fingerprinter {
        self.fingerprinter
    }

    /// Register modules in order, skipping any `(partition_key, id)` that is
    /// already present.
    pub fn add(&mut self, instances: impl IntoIterator<Item = ModuleInstance>) {
        for instance in instances {
            let ModuleInstance {
                partition_key,
                id,
                initial_state,
                transition,
            } = instance;

            if self.root.module(&partition_key, &id).is_some() {
                tracing::trace!(
                    partition = %partition_key,
                    module = %id,
                    "Module already registered, skipping"
                );
                continue;
            }

            let state = Arc::new(self.fingerprinter.tag(initial_state));
            let partition = self
                .root
                .partitions_mut()
                .entry(partition_key.clone())
                .or_default();
            Arc::make_mut(partition).insert(id.clone(), state);
            self.transitions.entries_mut().insert(id.clone(), transition);

            tracing::debug!(partition = %partition_key, module = %id, "Module registered");
        }
    }

    /// Remove the selected modules, then prune empty partitions and orphaned
    /// transitions.
    pub fn remove(&mut self, selectors: &[ModuleSelector]) {
        for selector in selectors {
            match (selector.partition_key(), selector.id()) {
                (None, None) => continue,
                (Some(partition_key), Some(id)) => {
                    if self.root.module(partition_key, id).is_none() {
                        continue;
                    }
                    if let Some(partition) = self.root.partitions_mut().get_mut(partition_key) {
                        Arc::make_mut(partition).remove(id);
                    }
                    tracing::debug!(partition = %partition_key, module = %id, "Module removed");
                }
                (Some(partition_key), None) => {
                    if self.root.partition(partition_key).is_none() {
                        continue;
                    }
                    self.root.partitions_mut().remove(partition_key);
                    tracing::debug!(partition = %partition_key, "Partition removed");
                }
                (None, Some(id)) => {
                    let holders: Vec<String> = self
                        .root
                        .iter()
                        .filter(|(_, partition)| partition.contains(id))
                        .map(|(key, _)| key.to_string())
                        .collect();
                    if holders.is_empty() {
                        continue;
                    }

                    let partitions = self.root.partitions_mut();
                    for key in &holders {
                        if let Some(partition) = partitions.get_mut(key) {
                            Arc::make_mut(partition).remove(id);
                        }
                    }
                    tracing::debug!(
                        module = %id,
                        partitions = holders.len(),
                        "Module removed from all partitions"
                    );
                }
            }
        }

        self.prune();
    }

    fn prune(&mut self) {
        if self.root.iter().any(|(_, partition)| partition.is_empty()) {
            self.root
                .partitions_mut()
                .retain(|_, partition| !partition.is_empty());
        }

        let orphaned: Vec<String> = self
            .transitions
            .ids()
            .filter(|id| !self.root.iter().any(|(_, partition)| partition.contains(id)))
            .map(str::to_string)
            .collect();
        if orphaned.is_empty() {
            return;
        }

        let entries = self.transitions.entries_mut();
        for id in &orphaned {
            entries.remove(id);
        }
        tracing::trace!(modules = ?orphaned, "Dropped transitions with no remaining module");
    }

    /// Look up the current state and transition for a dispatch target.
    pub fn resolve(
        &self,
        partition_key: &str,
        id: &str,
    ) -> Result<(Arc<TaggedValue>, Arc<dyn Transition>), StoreError> {
        let state = self.locate(partition_key, id)?;
        let transition =
            self.transitions
                .get(id)
                .ok_or_else(|| StoreError::UnknownTransition { id: id.to_string() })?;
        Ok((Arc::clone(state), Arc::clone(transition)))
    }

    /// Swap in a new state for one module, copying only the path to it.
    ///
    /// The target is resolved again against the current root so that modules
    /// registered or removed while the transition ran are not lost. `expected`
    /// is the leaf the transition started from; if the module was removed and
    /// registered again in the meantime, the commit is refused.
    pub fn replace(
        &mut self,
        partition_key: &str,
        id: &str,
        expected: &Arc<TaggedValue>,
        state: TaggedValue,
    ) -> Result<(), StoreError> {
        if !Arc::ptr_eq(self.locate(partition_key, id)?, expected) {
            tracing::debug!(
                partition = %partition_key,
                module = %id,
                "Module re-registered during its transition, dropping result"
            );
            return Err(StoreError::UnknownModuleInPartition {
                partition_key: partition_key.to_string(),
                id: id.to_string(),
            });
        }
        if let Some(partition) = self.root.partitions_mut().get_mut(partition_key) {
            Arc::make_mut(partition).insert(id.to_string(), Arc::new(state));
        }
        Ok(())
    }

    fn locate(&self, partition_key: &str, id: &str) -> Result<&Arc<TaggedValue>, StoreError> {
        let partition =
            self.root
                .partition(partition_key)
                .ok_or_else(|| StoreError::UnknownPartition {
                    partition_key: partition_key.to_string(),
                })?;
        partition
            .get(id)
            .ok_or_else(|| StoreError::UnknownModuleInPartition {
                partition_key: partition_key.to_string(),
                id: id.to_string(),
            })
    }

    #[cfg(test)]
    pub(crate) fn forget_transition(&mut self, id: &str) {
        self.transitions.entries_mut().remove(id);
    }
}
