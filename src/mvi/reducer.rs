//! Reducer trait and its bridge into the store.

use std::marker::PhantomData;

use serde_json::Value;

use super::intent::Intent;
use super::state::ModuleState;
use crate::module::{Action, Transition, TransitionError};

/// Reducer transforms typed module state based on intents.
///
/// The reducer is the only place where the module's state changes.
/// It must be a pure function: (State, Intent) -> State
pub trait Reducer: 'static {
    /// The state type this reducer operates on.
    type State: ModuleState;

    /// The intent type this reducer handles.
    type Intent: Intent;

    /// Process an intent and return the new state.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}

/// Runs a [`Reducer`] against the JSON state held by the store.
///
/// Decodes the leaf into `R::State` and the action into `R::Intent`, reduces,
/// then encodes the result back into the draft.
pub struct ReducerTransition<R> {
    _reducer: PhantomData<fn() -> R>,
}

impl<R> ReducerTransition<R> {
    pub fn new() -> Self {
        Self {
            _reducer: PhantomData,
        }
    }
}

impl<R> Default for ReducerTransition<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Reducer> Transition for ReducerTransition<R> {
    fn apply(&self, state: &mut Value, action: &Action) -> Result<(), TransitionError> {
        let intent = R::Intent::from_action(action)?;
        let current: R::State =
            serde_json::from_value(std::mem::take(state)).map_err(TransitionError::State)?;

        let next = R::reduce(current, intent);
        *state = serde_json::to_value(next).map_err(TransitionError::State)?;
        Ok(())
    }
}
