//! Dynamic modular state container.
//!
//! A [`Store`] holds independently-addressable module states under a
//! two-level key: a partition key and a module id. Each module changes only
//! through its own transition, and listeners subscribe at whatever
//! granularity they need, from every dispatch down to one exact module.
//!
//! ```text
//! RootState
//! ├─ "h1"                    (partition)
//! │   ├─ "m1" → {f: 0}#tag   (module state, fingerprinted)
//! │   └─ "m2" → [1, 2]#tag
//! └─ "h2"
//!     └─ "m1" → {f: 5}#tag
//! ```
//!
//! ```
//! use modstore::{create_store, Action, ModuleInstance};
//! use serde_json::json;
//!
//! let store = create_store(vec![ModuleInstance::new(
//!     "h1",
//!     "m1",
//!     json!({"f": 0}),
//!     |state, _action| state["f"] = json!(state["f"].as_i64().unwrap_or(0) + 1),
//! )]);
//!
//! store.dispatch(Action::new("h1", "m1", "inc")).unwrap();
//! assert_eq!(store.get_state().unwrap().to_value(), json!({"h1": {"m1": {"f": 1}}}));
//! ```

pub mod config;
pub mod fingerprint;
pub mod module;
pub mod mvi;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use fingerprint::{Fingerprint, TaggedValue};
pub use module::{Action, ModuleInstance, ModuleSelector, Transition, TransitionError};
pub use store::{
    create_store, create_store_with, Enhancer, RootState, Store, StoreCreator, StoreError,
    Subscription, SubscriptionFilter, TransitionTable,
};
