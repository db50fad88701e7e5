//! Store configuration, loaded from TOML.
//!
//! ```toml
//! name = "session"
//!
//! [fingerprint]
//! seed = 7
//! ```

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{FingerprintConfig, StoreConfig};
