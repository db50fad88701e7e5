//! Typed module primitives.
//!
//! Lets an application write a module as a strongly-typed pure reducer
//! instead of editing raw JSON.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Intent ──→ Reducer ──→ State ──→ store leaf (tagged JSON)
//!   ↑                                              │
//!   └──────────────── dispatch ────────────────────┘
//! ```
//!
//! - **State**: Serializable module state
//! - **Intent**: Typed decoding of an action's `type` and `payload`
//! - **Reducer**: Pure function that transforms state based on intents

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::{Reducer, ReducerTransition};
pub use state::ModuleState;
