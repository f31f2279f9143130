//! Tasks and the channels that carry them.
//!
//! # Flow
//!
//! 1. The scheduler posts a `DeliverWebhook` task to the server.
//! 2. The server pushes it onto the delivery channel as a `DeliveryJob`.
//! 3. `DeliveryWorker` pulls it off and hands it to `WebhookDeliverer`.
//! 4. The result goes back on the job's reply channel and the server
//!    answers the scheduler with it.
//!
//! Tasks carry identifiers; the deliverer re-reads everything it needs.

pub mod channels;
pub mod types;

pub use channels::{
    DEFAULT_CHANNEL_BUFFER, DeliverWebhookReceiver, DeliverWebhookSender, deliver_webhook_channel,
};
pub use types::{DeliverWebhook, DeliveryJob, DeliveryResult};
