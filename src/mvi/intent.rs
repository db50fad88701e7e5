//! Base trait for typed intents decoded from actions.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::module::{Action, TransitionError};

/// Typed view of an [`Action`] for one module.
///
/// The default decoding treats the action as an adjacently tagged enum:
/// `type` selects the variant and `payload` carries its content. Derive it
/// with `#[serde(tag = "type", content = "payload")]`. A `null` payload is
/// left out so unit variants decode without content.
pub trait Intent: DeserializeOwned + Send + 'static {
    fn from_action(action: &Action) -> Result<Self, TransitionError> {
        let mut envelope = Map::new();
        envelope.insert("type".to_string(), Value::String(action.kind.clone()));
        if !action.payload.is_null() {
            envelope.insert("payload".to_string(), action.payload.clone());
        }
        serde_json::from_value(Value::Object(envelope)).map_err(TransitionError::Intent)
    }
}
