use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Name attached to the store's log spans.
    #[serde(default = "default_store_name")]
    pub name: String,
    #[serde(default)]
    pub fingerprint: FingerprintConfig,
}

/// Settings for state fingerprinting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Seed mixed into both hash lanes (default: 0).
    #[serde(default)]
    pub seed: u32,
}

fn default_store_name() -> String {
    "modstore".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            fingerprint: FingerprintConfig::default(),
        }
    }
}
