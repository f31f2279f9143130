//! Task types flowing through the delivery pipeline.

use crate::webhooks::{DeliveryError, DeliveryReport};
use hookrelay_sdk::objects::{DeliverWebhookRequest, Event};
use tokio::sync::oneshot;
use uuid::Uuid;

/// What the worker hands back for one task.
pub type DeliveryResult = Result<DeliveryReport, DeliveryError>;

/// One delivery attempt of one event to one subscription.
///
/// The scheduler fans an event out into one task per matching
/// subscription. Tasks carry the subscription id rather than the row; the
/// deliverer re-reads it so a task queued before a deletion sees the
/// deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliverWebhook {
    pub subscription_id: Uuid,
    pub event: Event,
}

impl From<DeliverWebhookRequest> for DeliverWebhook {
    fn from(request: DeliverWebhookRequest) -> Self {
        Self {
            subscription_id: request.subscription_id,
            event: request.event,
        }
    }
}

/// A task queued for the worker, with the channel its result goes back on.
#[derive(Debug)]
pub struct DeliveryJob {
    pub task: DeliverWebhook,
    pub reply: oneshot::Sender<DeliveryResult>,
}

impl DeliveryJob {
    pub fn new(task: DeliverWebhook) -> (Self, oneshot::Receiver<DeliveryResult>) {
        let (reply, reply_rx) = oneshot::channel();
        (Self { task, reply }, reply_rx)
    }
}
