//! The webhook delivery pipeline.
//!
//! Classifier → payload builder → ledger (`pending`) → executor → ledger
//! (outcome) → breaker. [`WebhookDeliverer`] drives one task through it.

pub mod breaker;
pub mod classifier;
pub mod executor;
pub mod ledger;
pub mod payload;
pub mod task;

pub use breaker::FAILURE_WINDOW;
pub use classifier::{Classification, HandlerFamily, IgnoreReason, classify};
pub use executor::{DeliveryExecutor, DeliveryOutcome, MAX_RESPONSE_BODY_BYTES};
pub use payload::PayloadBuilder;
pub use task::{DeliveryError, DeliveryReport, WebhookDeliverer};
