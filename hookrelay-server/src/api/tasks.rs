//! Task API handlers.
//!
//! Called by the task scheduler, one request per (event, subscription)
//! pair. Requires the `Hookrelay-Admin-Authorization` header.
//!
//! # Endpoints
//!
//! - `POST /deliver-webhook` – run one delivery task and report its result

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use hookrelay_core::events::{DeliverWebhook, DeliveryJob};
use hookrelay_core::webhooks::DeliveryError;
use hookrelay_sdk::objects::{DeliverWebhookRequest, DeliverWebhookResponse};

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

/// Build the Task API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/deliver-webhook", post(deliver_webhook))
}

/// Errors that can occur in Task API handlers.
///
/// Anything but a success tells the scheduler to retry the task later.
#[derive(Debug)]
pub(crate) enum TaskApiError {
    /// The worker is gone or dropped the job before running it.
    WorkerUnavailable,
    Delivery(DeliveryError),
}

impl IntoResponse for TaskApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            TaskApiError::WorkerUnavailable => {
                tracing::error!("Task API: delivery worker unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "delivery worker unavailable").into_response()
            }
            TaskApiError::Delivery(e @ DeliveryError::SubscriptionNotFound(_)) => {
                (StatusCode::NOT_FOUND, e.to_string()).into_response()
            }
            TaskApiError::Delivery(e @ DeliveryError::MissingReference { .. }) => {
                tracing::error!(error = %e, "Task API: malformed event");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
            TaskApiError::Delivery(e @ DeliveryError::Database(_)) => {
                tracing::error!(error = %e, "Task API: storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

/// `POST /deliver-webhook`: run one delivery through the worker.
///
/// Responds once the attempt is recorded. Waits while the queue is full.
async fn deliver_webhook(
    state: axum::extract::State<AppState>,
    _auth: AdminAuth,
    Json(request): Json<DeliverWebhookRequest>,
) -> Result<impl IntoResponse, TaskApiError> {
    let task = DeliverWebhook::from(request);
    tracing::debug!(
        subscription_id = %task.subscription_id,
        event = %task.event.name,
        "Queueing webhook delivery"
    );

    let (job, reply) = DeliveryJob::new(task);
    state
        .task_tx
        .send(job)
        .await
        .map_err(|_| TaskApiError::WorkerUnavailable)?;

    let report = reply
        .await
        .map_err(|_| TaskApiError::WorkerUnavailable)?
        .map_err(TaskApiError::Delivery)?;

    Ok(Json(DeliverWebhookResponse::from(&report)))
}
