//! `WebhookDeliverer`: one delivery task from subscription lookup to
//! breaker evaluation.
//!
//! The flow for a `DeliverWebhook` task:
//! - Look up the live subscription; a missing one fails the task
//! - Classify the event; ignored events stop here with no ledger row
//! - Build the payload from current entity state
//! - Open a `pending` ledger row
//! - POST the envelope
//! - Finalize the ledger row
//! - On failure, let the breaker look at recent history

use super::breaker;
use super::classifier::{Classification, HandlerFamily, IgnoreReason, classify};
use super::executor::{DeliveryExecutor, DeliveryOutcome};
use super::ledger::{self, SentRequest};
use crate::entities::{WebhookDeliveryStatus, WebhookSubscription};
use crate::events::DeliverWebhook;
use crate::store::{StoreError, WebhookStore};
use hookrelay_sdk::objects::{DeliverWebhookResponse, WebhookEnvelope};
use kanau::processor::Processor;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Errors that fail a delivery task.
///
/// Endpoint failures are not errors: they end up as `failed` ledger rows.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The subscription does not exist or was deleted.
    #[error("webhook subscription not found: {0}")]
    SubscriptionNotFound(Uuid),

    /// A known event lacks the id its family is keyed by.
    #[error("event {event} is missing {field}")]
    MissingReference { event: String, field: &'static str },

    #[error("storage error: {0}")]
    Database(#[from] StoreError),
}

/// How a task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    /// Nothing was sent and nothing recorded.
    Ignored(IgnoreReason),
    /// One attempt was made and recorded.
    Attempted {
        delivery_id: Uuid,
        family: HandlerFamily,
        status: WebhookDeliveryStatus,
        status_code: Option<u16>,
        /// The breaker disabled the subscription after this attempt.
        subscription_disabled: bool,
    },
}

impl From<&DeliveryReport> for DeliverWebhookResponse {
    fn from(report: &DeliveryReport) -> Self {
        match report {
            DeliveryReport::Ignored(_) => Self {
                ignored: true,
                delivery_id: None,
                status: None,
                status_code: None,
                subscription_disabled: false,
            },
            DeliveryReport::Attempted {
                delivery_id,
                status,
                status_code,
                subscription_disabled,
                ..
            } => Self {
                ignored: false,
                delivery_id: Some(*delivery_id),
                status: Some((*status).into()),
                status_code: *status_code,
                subscription_disabled: *subscription_disabled,
            },
        }
    }
}

/// Runs delivery tasks against a store and an executor.
///
/// Cheap to clone; the worker clones one per task.
#[derive(Clone)]
pub struct WebhookDeliverer {
    store: Arc<dyn WebhookStore>,
    executor: Arc<DeliveryExecutor>,
}

impl WebhookDeliverer {
    pub fn new(store: Arc<dyn WebhookStore>, executor: DeliveryExecutor) -> Self {
        Self {
            store,
            executor: Arc::new(executor),
        }
    }

    async fn attempt(
        &self,
        task: &DeliverWebhook,
        subscription: &WebhookSubscription,
        family: HandlerFamily,
    ) -> Result<DeliveryReport, DeliveryError> {
        let store = self.store.as_ref();
        let payload = family.builder().build(store, &task.event).await?;

        let delivery = ledger::open(store, subscription.id).await?;

        let envelope = WebhookEnvelope {
            id: delivery.id,
            actor_id: task.event.actor_id,
            webhook_subscription_id: subscription.id,
            created_at: delivery.created_at,
            event: task.event.name.clone(),
            payload,
        };
        let request_headers = self.executor.request_headers();

        let (request_body, outcome) = match serde_json::to_value(&envelope) {
            Ok(body) => {
                let outcome = self
                    .executor
                    .send(&subscription.url, body.to_string())
                    .await;
                (Some(body), outcome)
            }
            Err(e) => (
                None,
                DeliveryOutcome::NoResponse {
                    error: format!("failed to serialize envelope: {e}"),
                },
            ),
        };

        match &outcome {
            DeliveryOutcome::Responded { status, .. } if outcome.is_success() => {
                info!(
                    subscription_id = %subscription.id,
                    delivery_id = %delivery.id,
                    event = %task.event.name,
                    status = *status,
                    "Webhook delivered"
                );
            }
            DeliveryOutcome::Responded { status, .. } => {
                warn!(
                    subscription_id = %subscription.id,
                    delivery_id = %delivery.id,
                    event = %task.event.name,
                    status = *status,
                    "Webhook endpoint rejected delivery"
                );
            }
            DeliveryOutcome::NoResponse { error } => {
                warn!(
                    subscription_id = %subscription.id,
                    delivery_id = %delivery.id,
                    event = %task.event.name,
                    error = %error,
                    "Webhook delivery failed without response"
                );
            }
        }

        let sent = SentRequest {
            body: request_body,
            headers: request_headers,
        };
        let finalized = ledger::finalize(store, delivery.id, sent, &outcome).await?;

        let subscription_disabled = if outcome.is_success() {
            false
        } else {
            breaker::evaluate(store, subscription).await?
        };

        Ok(DeliveryReport::Attempted {
            delivery_id: finalized.id,
            family,
            status: finalized.status,
            status_code: outcome.status_code(),
            subscription_disabled,
        })
    }
}

impl Processor<DeliverWebhook> for WebhookDeliverer {
    type Output = DeliveryReport;
    type Error = DeliveryError;

    #[tracing::instrument(
        skip_all,
        err,
        name = "DeliverWebhook",
        fields(subscription_id = %task.subscription_id, event = %task.event.name)
    )]
    async fn process(&self, task: DeliverWebhook) -> Result<DeliveryReport, DeliveryError> {
        let subscription = self
            .store
            .find_subscription(task.subscription_id)
            .await?
            .ok_or(DeliveryError::SubscriptionNotFound(task.subscription_id))?;

        info!(
            url = %subscription.url,
            enabled = subscription.enabled,
            "Processing webhook delivery"
        );

        let family = match classify(&task.event.name) {
            Classification::Handler(family) => family,
            Classification::Ignored(reason) => {
                debug!(reason = ?reason, "Event produces no webhook");
                return Ok(DeliveryReport::Ignored(reason));
            }
        };
        self.attempt(&task, &subscription, family).await
    }
}
