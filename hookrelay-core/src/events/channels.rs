//! Channel factories for pipeline tasks.

use super::types::DeliveryJob;
use tokio::sync::mpsc;

/// Buffer size for task channels.
///
/// Large enough to absorb a fan-out burst; when full, the HTTP entry point
/// waits instead of dropping tasks.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

pub type DeliverWebhookSender = mpsc::Sender<DeliveryJob>;
pub type DeliverWebhookReceiver = mpsc::Receiver<DeliveryJob>;

/// Create the channel feeding the delivery worker.
pub fn deliver_webhook_channel() -> (DeliverWebhookSender, DeliverWebhookReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
