//! Base trait for typed module state.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Marker trait for typed module state.
///
/// States should be:
/// - Serializable (the store keeps them as fingerprinted JSON)
/// - Cloneable and comparable (for tests and change detection)
/// - Defaultable (the starting point of [`crate::ModuleInstance::from_default`])
pub trait ModuleState:
    Serialize + DeserializeOwned + Clone + PartialEq + Default + Send + 'static
{
}
