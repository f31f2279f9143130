//! Long-running processors.
//!
//! - `DeliveryWorker`: receives `DeliveryJob`s, runs deliveries and replies

pub mod delivery_worker;

pub use delivery_worker::{DeliveryWorker, ExecutorFactory};
