//! Module building blocks: actions, transitions and module instances.
//!
//! A module is a unit of independently-updatable state. Placing it under a
//! partition key yields a [`ModuleInstance`], addressable by
//! `(partition_key, id)` in the store's root state.

mod action;
mod instance;
pub mod transition;

pub use action::Action;
pub use instance::{ModuleInstance, ModuleSelector};
pub(crate) use instance::non_empty;
pub use transition::{Transition, TransitionError};
