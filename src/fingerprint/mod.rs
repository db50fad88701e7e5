//! Content fingerprinting for state values.
//!
//! Every container node (object or array) of a module's state is stamped with
//! a deterministic hash of its contents, computed bottom-up. Consumers can
//! compare fingerprints as a cheap approximation of structural equality.
//!
//! ```text
//! {"a": {"b": [1, "x"]}}     tag ──→  Object#19fw1vz108z6do
//!                                       └─ a: Object#…
//!                                            └─ b: Array#…
//!                                                 ├─ 1
//!                                                 └─ "x"
//! ```

mod hash;
mod tagged;

pub use hash::Fingerprint;
pub use tagged::{tag, untag, Fingerprinter, TaggedValue};
