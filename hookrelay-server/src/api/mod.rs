//! HTTP API surface.
//!
//! - `/tasks`: scheduler entry point
//! - `/admin`: read-only subscription and delivery views

pub mod admin;
pub mod extractors;
pub mod tasks;
