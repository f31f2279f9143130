//! The delivery audit log.
//!
//! Every attempt that gets past payload building writes exactly one row
//! before the network call ([`open`]) and updates it exactly once after
//! ([`finalize`]), whether or not a response came back.

use super::executor::DeliveryOutcome;
use crate::entities::webhook_deliveries::FinalizeWebhookDelivery;
use crate::entities::{Headers, WebhookDelivery};
use crate::store::{StoreError, WebhookStore};
use tracing::debug;
use uuid::Uuid;

/// Insert the `pending` row for an attempt.
pub async fn open(
    store: &dyn WebhookStore,
    subscription_id: Uuid,
) -> Result<WebhookDelivery, StoreError> {
    let delivery = store.create_delivery(subscription_id).await?;
    debug!(
        subscription_id = %subscription_id,
        delivery_id = %delivery.id,
        "Opened webhook delivery"
    );
    Ok(delivery)
}

/// What was put on the wire.
#[derive(Debug, Clone)]
pub struct SentRequest {
    /// `None` only if the envelope could not be serialized.
    pub body: Option<serde_json::Value>,
    pub headers: Headers,
}

/// Record the outcome of an attempt on its row.
///
/// Without a response the status code is null, the response body empty and
/// the response headers an empty map.
pub async fn finalize(
    store: &dyn WebhookStore,
    delivery_id: Uuid,
    request: SentRequest,
    outcome: &DeliveryOutcome,
) -> Result<WebhookDelivery, StoreError> {
    store.finalize_delivery(finalize_update(delivery_id, request, outcome)).await
}

fn finalize_update(
    delivery_id: Uuid,
    request: SentRequest,
    outcome: &DeliveryOutcome,
) -> FinalizeWebhookDelivery {
    let (response_body, response_headers) = match outcome {
        DeliveryOutcome::Responded { body, headers, .. } => (body.clone(), headers.clone()),
        DeliveryOutcome::NoResponse { .. } => (String::new(), Headers::new()),
    };
    FinalizeWebhookDelivery {
        delivery_id,
        status: outcome.status(),
        status_code: outcome.status_code().map(i32::from),
        request_body: request.body,
        request_headers: request.headers,
        response_body,
        response_headers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::WebhookDeliveryStatus;
    use crate::store::memory::MemoryStore;

    fn sent() -> SentRequest {
        SentRequest {
            body: Some(serde_json::json!({ "event": "documents.publish" })),
            headers: Headers::from([(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )]),
        }
    }

    #[tokio::test]
    async fn test_open_then_finalize_success() {
        let store = MemoryStore::new();
        let subscription_id = Uuid::new_v4();

        let delivery = open(&store, subscription_id).await.unwrap();
        assert_eq!(delivery.status, WebhookDeliveryStatus::Pending);

        let outcome = DeliveryOutcome::Responded {
            status: 204,
            body: String::new(),
            headers: Headers::from([("server".to_string(), "test".to_string())]),
        };
        let done = finalize(&store, delivery.id, sent(), &outcome).await.unwrap();

        assert_eq!(done.id, delivery.id);
        assert_eq!(done.status, WebhookDeliveryStatus::Success);
        assert_eq!(done.status_code, Some(204));
        assert_eq!(done.request_body.unwrap().0["event"], "documents.publish");
        assert_eq!(done.response_headers.unwrap().0["server"], "test");
        assert_eq!(store.deliveries().len(), 1);
    }

    #[tokio::test]
    async fn test_finalize_without_response() {
        let store = MemoryStore::new();
        let delivery = open(&store, Uuid::new_v4()).await.unwrap();

        let outcome = DeliveryOutcome::NoResponse {
            error: "connection refused".to_string(),
        };
        let done = finalize(&store, delivery.id, sent(), &outcome).await.unwrap();

        assert_eq!(done.status, WebhookDeliveryStatus::Failed);
        assert_eq!(done.status_code, None);
        assert_eq!(done.response_body.as_deref(), Some(""));
        assert!(done.response_headers.unwrap().0.is_empty());
        assert!(done.request_headers.unwrap().0.contains_key("Content-Type"));
    }

    #[tokio::test]
    async fn test_finalize_unknown_delivery() {
        let store = MemoryStore::new();
        let outcome = DeliveryOutcome::NoResponse {
            error: "timeout".to_string(),
        };
        let err = finalize(&store, Uuid::new_v4(), sent(), &outcome)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DeliveryNotFound(_)));
    }
}
