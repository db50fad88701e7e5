//! Module instances and removal selectors.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::action::Action;
use super::transition::{mutate, Transition, TransitionError};
use crate::mvi::{Reducer, ReducerTransition};

/// A module placed in a partition: its id, initial state and transition.
#[derive(Clone)]
pub struct ModuleInstance {
    pub partition_key: String,
    pub id: String,
    pub initial_state: Value,
    pub transition: Arc<dyn Transition>,
}

impl ModuleInstance {
    /// Module whose transition edits the state in place.
    pub fn new<F>(
        partition_key: impl Into<String>,
        id: impl Into<String>,
        initial_state: Value,
        transition: F,
    ) -> Self
    where
        F: Fn(&mut Value, &Action) + Send + Sync + 'static,
    {
        Self::with_transition(partition_key, id, initial_state, mutate(transition))
    }

    /// Module driven by an already-built transition, e.g. one shared between
    /// several modules or made with [`crate::module::transition::replace`].
    pub fn with_transition(
        partition_key: impl Into<String>,
        id: impl Into<String>,
        initial_state: Value,
        transition: Arc<dyn Transition>,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            id: id.into(),
            initial_state,
            transition,
        }
    }

    /// Module driven by a typed [`Reducer`].
    ///
    /// # Errors
    /// Returns an error if `initial_state` cannot be serialized to JSON.
    pub fn from_reducer<R: Reducer>(
        partition_key: impl Into<String>,
        id: impl Into<String>,
        initial_state: R::State,
    ) -> Result<Self, TransitionError> {
        let initial_state = serde_json::to_value(initial_state).map_err(TransitionError::State)?;
        Ok(Self::with_transition(
            partition_key,
            id,
            initial_state,
            Arc::new(ReducerTransition::<R>::new()),
        ))
    }

    /// Typed module starting from `R::State::default()`.
    pub fn from_default<R: Reducer>(
        partition_key: impl Into<String>,
        id: impl Into<String>,
    ) -> Result<Self, TransitionError> {
        Self::from_reducer::<R>(partition_key, id, R::State::default())
    }

    /// Copy of this module placed in another partition.
    pub fn in_partition(&self, partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            ..self.clone()
        }
    }

    /// Copy of this module with a different initial state.
    pub fn with_initial_state(&self, initial_state: Value) -> Self {
        Self {
            initial_state,
            ..self.clone()
        }
    }
}

impl fmt::Debug for ModuleInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleInstance")
            .field("partition_key", &self.partition_key)
            .field("id", &self.id)
            .field("initial_state", &self.initial_state)
            .finish_non_exhaustive()
    }
}

/// Picks modules to remove: one leaf, a whole partition, or one id everywhere.
///
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSelector {
    pub partition_key: Option<String>,
    pub id: Option<String>,
}

impl ModuleSelector {
    /// The module `id` inside `partition_key` only.
    pub fn exact(partition_key: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            partition_key: Some(partition_key.into()),
            id: Some(id.into()),
        }
    }

    /// Every module in `partition_key`.
    pub fn partition(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: Some(partition_key.into()),
            id: None,
        }
    }

    /// Module `id` in every partition.
    pub fn module(id: impl Into<String>) -> Self {
        Self {
            partition_key: None,
            id: Some(id.into()),
        }
    }

    pub fn partition_key(&self) -> Option<&str> {
        non_empty(self.partition_key.as_deref())
    }

    pub fn id(&self) -> Option<&str> {
        non_empty(self.id.as_deref())
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn in_partition_shares_transition() {
        let module = ModuleInstance::new("h1", "m1", json!({"f": 0}), |_, _| {});
        let moved = module.in_partition("h2");

        assert_eq!(moved.partition_key, "h2");
        assert_eq!(moved.id, "m1");
        assert!(Arc::ptr_eq(&module.transition, &moved.transition));
    }

    #[test]
    fn selector_treats_empty_as_absent() {
        let selector = ModuleSelector {
            partition_key: Some("h2".to_string()),
            id: Some(String::new()),
        };
        assert_eq!(selector.partition_key(), Some("h2"));
        assert_eq!(selector.id(), None);
        assert_eq!(ModuleSelector::default().partition_key(), None);
    }

    #[test]
    fn debug_omits_transition() {
        let module = ModuleInstance::new("h1", "m1", json!(1), |_, _| {});
        let rendered = format!("{module:?}");
        assert!(rendered.contains("\"m1\""));
        assert!(rendered.ends_with(".. }"));
    }
}
