//! The store: registry, dispatch and notification behind one handle.
//!
//! # Architecture
//!
//! ```text
//! add_modules ──→ ModuleRegistry ──→ RootState ──→ get_state
//!                      ↑                 │
//! dispatch(action) ────┘ (path copy)     └──→ listeners(prev, next)
//! ```
//!
//! A [`Store`] is a cheap, cloneable handle. Every operation takes the same
//! reentrant lock, so a transition or listener may call back into the store
//! from the same thread. While a transition runs, the calls that would observe
//! or disturb a half-finished dispatch (`dispatch`, `get_state`, `subscribe`,
//! `unsubscribe`) fail with a [`StoreError`] instead.

use std::cell::RefCell;
use std::sync::Arc;

use parking_lot::ReentrantMutex;

use crate::config::StoreConfig;
use crate::fingerprint::Fingerprinter;
use crate::module::{ModuleInstance, ModuleSelector};

mod dispatch;
mod enhancer;
mod error;
mod listeners;
mod registry;
mod state;

pub use enhancer::{create_store, create_store_with, Enhancer, StoreCreator};
pub use error::StoreError;
pub use listeners::{Listener, Subscription, SubscriptionFilter};
pub use state::{Partition, RootState, TransitionTable};

use listeners::ListenerRegistry;
use registry::ModuleRegistry;

/// Mutable store internals, only ever touched under the store lock.
#[derive(Debug)]
pub(crate) struct StoreCore {
    registry: ModuleRegistry,
    listeners: ListenerRegistry,
    dispatching: bool,
}

pub(crate) type Shared = ReentrantMutex<RefCell<StoreCore>>;

/// Handle to a modular state store.
#[derive(Clone)]
pub struct Store {
    shared: Arc<Shared>,
    name: Arc<str>,
}

impl Store {
    /// Create a store holding `instances`.
    pub fn new(instances: impl IntoIterator<Item = ModuleInstance>) -> Self {
        Self::with_config(instances, &StoreConfig::default())
    }

    /// Create a store using `config`, then register `instances`.
    pub fn with_config(
        instances: impl IntoIterator<Item = ModuleInstance>,
        config: &StoreConfig,
    ) -> Self {
        let core = StoreCore {
            registry: ModuleRegistry::new(Fingerprinter::new(config.fingerprint.seed)),
            listeners: ListenerRegistry::default(),
            dispatching: false,
        };
        let store = Self {
            shared: Arc::new(ReentrantMutex::new(RefCell::new(core))),
            name: Arc::from(config.name.as_str()),
        };
        tracing::debug!(store = %store.name, seed = config.fingerprint.seed, "Store created");
        store.add_modules(instances);
        store
    }

    /// Register modules. Instances whose `(partition_key, id)` is already
    /// present are skipped, keeping the existing state and transition.
    pub fn add_modules(&self, instances: impl IntoIterator<Item = ModuleInstance>) {
        let instances: Vec<ModuleInstance> = instances.into_iter().collect();
        let _span = self.span().entered();
        let guard = self.shared.lock();
        guard.borrow_mut().registry.add(instances);
    }

    /// Remove modules by selector, then prune empty partitions and
    /// transitions no module uses anymore.
    pub fn remove_modules(&self, selectors: &[ModuleSelector]) {
        let _span = self.span().entered();
        let guard = self.shared.lock();
        guard.borrow_mut().registry.remove(selectors);
    }

    /// Snapshot of the current root state.
    ///
    /// # Errors
    /// Returns [`StoreError::StateReadDuringDispatch`] when called from inside
    /// a transition.
    pub fn get_state(&self) -> Result<RootState, StoreError> {
        let guard = self.shared.lock();
        let core = guard.borrow();
        if core.dispatching {
            return Err(StoreError::StateReadDuringDispatch);
        }
        Ok(core.registry.root().clone())
    }

    /// Snapshot of the module id → transition table.
    pub fn get_modules(&self) -> TransitionTable {
        let guard = self.shared.lock();
        let table = guard.borrow().registry.transitions().clone();
        table
    }

    /// Register `listener` for dispatches matching `filter`.
    ///
    /// # Errors
    /// Returns [`StoreError::SubscribeDuringDispatch`] when called from inside
    /// a transition.
    pub fn subscribe<F>(
        &self,
        listener: F,
        filter: SubscriptionFilter,
    ) -> Result<Subscription, StoreError>
    where
        F: Fn(&RootState, &RootState) + Send + Sync + 'static,
    {
        let guard = self.shared.lock();
        let mut core = guard.borrow_mut();
        if core.dispatching {
            return Err(StoreError::SubscribeDuringDispatch);
        }

        let key = filter.key();
        let _span = self.span().entered();
        let listener_id = core.listeners.insert(key.clone(), Arc::new(listener));
        tracing::trace!(key = ?key, listener_id, "Listener added");

        Ok(Subscription::new(
            Arc::downgrade(&self.shared),
            key,
            listener_id,
        ))
    }

    /// Name given to this store through [`StoreConfig::name`].
    pub fn name(&self) -> &str {
        &self.name
    }

    fn span(&self) -> tracing::Span {
        tracing::debug_span!("store", name = %self.name)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.shared.lock();
        let result = match guard.try_borrow() {
            Ok(core) => f
                .debug_struct("Store")
                .field("name", &self.name)
                .field("core", &*core)
                .finish(),
            Err(_) => f
                .debug_struct("Store")
                .field("name", &self.name)
                .finish_non_exhaustive(),
        };
        result
    }
}
