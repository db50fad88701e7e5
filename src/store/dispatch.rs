//! Dispatch pipeline: resolve, transition, re-tag, swap, notify.

use std::cell::RefCell;

use crate::module::Action;

use super::error::StoreError;
use super::{Store, StoreCore};

impl Store {
    /// Apply `action` to the module it addresses and notify listeners.
    ///
    /// The transition runs on an untagged draft of the module's state. Its
    /// result is re-tagged and committed by copying only the path from the
    /// root to that module; every other partition and module keeps its
    /// identity. Listeners then run in order (unfiltered, partition, module,
    /// exact) with the previous and the new root.
    ///
    /// Returns the dispatched action.
    ///
    /// # Errors
    /// - [`StoreError::ReentrantDispatch`] when called from inside a transition
    /// - [`StoreError::UnknownPartition`], [`StoreError::UnknownModuleInPartition`]
    ///   or [`StoreError::UnknownTransition`] when the target does not resolve
    /// - [`StoreError::Transition`] when the transition itself fails
    ///
    /// The root state is unchanged and no listener runs on error.
    pub fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        let _span = self.span().entered();
        let guard = self.shared.lock();
        let cell: &RefCell<StoreCore> = &guard;

        let (previous, current, transition) = {
            let mut core = cell.borrow_mut();
            if core.dispatching {
                return Err(StoreError::ReentrantDispatch);
            }
            let (current, transition) = core
                .registry
                .resolve(&action.partition_key, &action.id)?;
            core.dispatching = true;
            (core.registry.root().clone(), current, transition)
        };
        let in_progress = scopeguard::guard((), |()| cell.borrow_mut().dispatching = false);

        let mut draft = current.to_value();
        transition
            .apply(&mut draft, &action)
            .map_err(|source| StoreError::Transition {
                id: action.id.clone(),
                source,
            })?;

        let next = {
            let mut core = cell.borrow_mut();
            let tagged = core.registry.fingerprinter().tag(draft);
            core.registry
                .replace(&action.partition_key, &action.id, &current, tagged)?;
            core.registry.root().clone()
        };
        drop(in_progress);

        let listeners = cell
            .borrow()
            .listeners
            .matching(&action.partition_key, &action.id);
        tracing::debug!(
            partition = %action.partition_key,
            module = %action.id,
            action = %action.kind,
            listeners = listeners.len(),
            "Action dispatched"
        );

        for listener in &listeners {
            listener(&previous, &next);
        }

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleInstance;
    use serde_json::json;

    #[test]
    fn failed_dispatch_clears_in_progress_flag() {
        let store = Store::new([ModuleInstance::new("h1", "m1", json!({"f": 0}), |_, _| {})]);

        let err = store.dispatch(Action::new("h1", "missing", "inc")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownModuleInPartition { .. }));
        assert!(store.get_state().is_ok());
    }

    #[test]
    fn panicking_transition_does_not_wedge_store() {
        let store = Store::new([ModuleInstance::new("h1", "boom", json!(0), |_, _| {
            panic!("transition blew up")
        })]);

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.dispatch(Action::new("h1", "boom", "go"))
        }));
        assert!(outcome.is_err());
        assert!(store.get_state().is_ok());
    }

    #[test]
    fn unknown_transition_is_reported() {
        let store = Store::new([ModuleInstance::new("h1", "m1", json!(0), |_, _| {})]);
        {
            let guard = store.shared.lock();
            guard.borrow_mut().registry.forget_transition("m1");
        }

        let err = store.dispatch(Action::new("h1", "m1", "inc")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownTransition { id } if id == "m1"));
    }
}
