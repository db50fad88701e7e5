//! Error types for store operations.

use thiserror::Error;

use crate::module::TransitionError;

/// Errors returned by [`crate::Store`] operations.
///
/// All of them are caller mistakes reported immediately; the store never
/// retries and is left unchanged when one is returned.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `dispatch` was called from inside a transition.
    #[error("Transitions may not dispatch actions")]
    ReentrantDispatch,

    /// `get_state` was called from inside a transition.
    #[error(
        "State may not be read while a transition is executing; \
         the transition already received its module's state"
    )]
    StateReadDuringDispatch,

    #[error("Listeners may not be added while a transition is executing")]
    SubscribeDuringDispatch,

    #[error("Listeners may not be removed while a transition is executing")]
    UnsubscribeDuringDispatch,

    /// No partition exists for the action's partition key.
    #[error("No module partition found for key '{partition_key}'")]
    UnknownPartition { partition_key: String },

    /// The partition exists but holds no module with the action's id.
    #[error("No module '{id}' found in partition '{partition_key}'")]
    UnknownModuleInPartition { partition_key: String, id: String },

    /// No transition is registered for the action's id.
    #[error("No transition registered for module '{id}'")]
    UnknownTransition { id: String },

    /// The module's transition failed; state is unchanged.
    #[error("Transition for module '{id}' failed: {source}")]
    Transition {
        id: String,
        #[source]
        source: TransitionError,
    },
}

impl StoreError {
    /// Stable snake_case name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::ReentrantDispatch => "reentrant_dispatch",
            StoreError::StateReadDuringDispatch => "state_read_during_dispatch",
            StoreError::SubscribeDuringDispatch => "subscribe_during_dispatch",
            StoreError::UnsubscribeDuringDispatch => "unsubscribe_during_dispatch",
            StoreError::UnknownPartition { .. } => "unknown_partition",
            StoreError::UnknownModuleInPartition { .. } => "unknown_module_in_partition",
            StoreError::UnknownTransition { .. } => "unknown_transition",
            StoreError::Transition { .. } => "transition_failed",
        }
    }
}
