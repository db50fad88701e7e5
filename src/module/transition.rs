//! Transition functions driving a module's state.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::action::Action;

/// Errors a transition can report instead of producing a new state.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// Module state could not be converted to or from its typed form.
    #[error("State conversion failed: {0}")]
    State(#[source] serde_json::Error),

    /// Action type/payload did not decode into the module's intent.
    #[error("Action decode failed: {0}")]
    Intent(#[source] serde_json::Error),

    /// The transition refused the action.
    #[error("Action rejected: {reason}")]
    Rejected { reason: String },
}

impl TransitionError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        TransitionError::Rejected {
            reason: reason.into(),
        }
    }
}

/// Computes a module's next state from its current state and an action.
///
/// The transition receives a private draft of the module's current value.
/// It may edit the draft in place or overwrite it entirely; the store tags and
/// commits whatever the draft holds once `apply` returns `Ok`. On `Err` the
/// draft is discarded and the store is left untouched.
pub trait Transition: Send + Sync + 'static {
    fn apply(&self, state: &mut Value, action: &Action) -> Result<(), TransitionError>;
}

/// In-place transition built from a closure.
pub struct Mutate<F>(F);

impl<F> Transition for Mutate<F>
where
    F: Fn(&mut Value, &Action) + Send + Sync + 'static,
{
    fn apply(&self, state: &mut Value, action: &Action) -> Result<(), TransitionError> {
        (self.0)(state, action);
        Ok(())
    }
}

/// Transition returning a fresh value.
pub struct Replace<F>(F);

impl<F> Transition for Replace<F>
where
    F: Fn(Value, &Action) -> Value + Send + Sync + 'static,
{
    fn apply(&self, state: &mut Value, action: &Action) -> Result<(), TransitionError> {
        let current = std::mem::take(state);
        *state = (self.0)(current, action);
        Ok(())
    }
}

/// In-place transition that may reject the action.
pub struct TryMutate<F>(F);

impl<F> Transition for TryMutate<F>
where
    F: Fn(&mut Value, &Action) -> Result<(), TransitionError> + Send + Sync + 'static,
{
    fn apply(&self, state: &mut Value, action: &Action) -> Result<(), TransitionError> {
        (self.0)(state, action)
    }
}

pub fn mutate<F>(f: F) -> Arc<dyn Transition>
where
    F: Fn(&mut Value, &Action) + Send + Sync + 'static,
{
    Arc::new(Mutate(f))
}

pub fn replace<F>(f: F) -> Arc<dyn Transition>
where
    F: Fn(Value, &Action) -> Value + Send + Sync + 'static,
{
    Arc::new(Replace(f))
}

pub fn try_mutate<F>(f: F) -> Arc<dyn Transition>
where
    F: Fn(&mut Value, &Action) -> Result<(), TransitionError> + Send + Sync + 'static,
{
    Arc::new(TryMutate(f))
}
