//! Actions addressed to a single module instance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An action routed to the module `id` inside partition `partition_key`.
///
/// `kind` travels as `type` on the wire so that typed intents can be decoded
/// as adjacently tagged enums (see [`crate::mvi::Intent`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub partition_key: String,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    /// Create an action with a `null` payload.
    pub fn new(
        partition_key: impl Into<String>,
        id: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            id: id.into(),
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Same action, addressed to another partition.
    pub fn in_partition(&self, partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            ..self.clone()
        }
    }
}
