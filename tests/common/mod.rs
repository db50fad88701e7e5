//! Shared test fixtures.

#![allow(dead_code, unused_imports)]

use modstore::{Action, ModuleInstance, RootState};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Route store logs to the test harness. Honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `hash1/module1`, toggles `field1` between "hello" and "hi".
pub fn module1() -> ModuleInstance {
    ModuleInstance::new("hash1", "module1", json!({"field1": "hello"}), |state, _| {
        let next = if state["field1"] == "hello" { "hi" } else { "hello" };
        state["field1"] = json!(next);
    })
}

/// `hash2/module2`, increments `field2`.
pub fn module2() -> ModuleInstance {
    ModuleInstance::new("hash2", "module2", json!({"field2": 42}), |state, _| {
        let current = state["field2"].as_i64().unwrap_or(0);
        state["field2"] = json!(current + 1);
    })
}

/// `hash3/module3`, negates `field3`.
pub fn module3() -> ModuleInstance {
    ModuleInstance::new("hash3", "module3", json!({"field3": true}), |state, _| {
        let current = state["field3"].as_bool().unwrap_or(false);
        state["field3"] = json!(!current);
    })
}

pub fn action_for(module: &ModuleInstance, kind: &str) -> Action {
    Action::new(module.partition_key.as_str(), module.id.as_str(), kind)
}

pub fn action1() -> Action {
    action_for(&module1(), "action1")
}

pub fn action2() -> Action {
    action_for(&module2(), "action2")
}

pub fn action3() -> Action {
    action_for(&module3(), "action3")
}

/// Records every `(previous, next)` pair a listener receives.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<(RootState, RootState)>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener(&self) -> impl Fn(&RootState, &RootState) + Send + Sync + 'static {
        let calls = Arc::clone(&self.calls);
        move |prev: &RootState, next: &RootState| calls.lock().push((prev.clone(), next.clone()))
    }

    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<(RootState, RootState)> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// True when exactly one call was received, with exactly these roots.
    pub fn called_once_with(&self, prev: &RootState, next: &RootState) -> bool {
        let calls = self.calls.lock();
        calls.len() == 1 && calls[0].0.ptr_eq(prev) && calls[0].1.ptr_eq(next)
    }
}

/// Plain JSON of one module's current state.
pub fn module_value(root: &RootState, partition_key: &str, id: &str) -> Option<Value> {
    root.module(partition_key, id).map(|state| state.to_value())
}
