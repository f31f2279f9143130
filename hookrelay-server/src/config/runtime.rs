//! Runtime configuration re-exports.
//!
//! The validated in-memory config types live in `hookrelay-core::config`.

pub use hookrelay_core::config::{AdminConfig, DeliveryConfig, ServerConfig, SharedConfig};
