//! Admin API handlers.
//!
//! Read-only views over subscriptions and the delivery log. Require the
//! `Hookrelay-Admin-Authorization` header with the plaintext admin secret.
//!
//! # Endpoints
//!
//! - `GET /subscriptions/{subscription_id}`            – subscription detail
//! - `GET /subscriptions/{subscription_id}/deliveries` – delivery log (paginated)

use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::state::AppState;

mod list_deliveries;
mod show_subscription;

/// Build the Admin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions/{subscription_id}",
            get(show_subscription::show_subscription),
        )
        .route(
            "/subscriptions/{subscription_id}/deliveries",
            get(list_deliveries::list_deliveries),
        )
}

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

/// Errors that can occur in Admin API handlers.
#[derive(Debug)]
pub(crate) enum AdminApiError {
    Store(hookrelay_core::store::StoreError),
    NotFound,
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AdminApiError::Store(e) => {
                tracing::error!(error = %e, "Admin API store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            AdminApiError::NotFound => {
                (StatusCode::NOT_FOUND, "resource not found").into_response()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

use hookrelay_core::entities::WebhookSubscription;
use hookrelay_sdk::objects::AdminSubscriptionResponse;

pub(crate) fn subscription_to_admin_response(s: &WebhookSubscription) -> AdminSubscriptionResponse {
    AdminSubscriptionResponse {
        id: s.id,
        team_id: s.team_id,
        name: s.name.clone(),
        url: s.url.clone(),
        enabled: s.enabled,
        events: s.events.clone(),
        created_at: s.created_at.unix_timestamp(),
        updated_at: s.updated_at.unix_timestamp(),
        deleted_at: s.deleted_at.map(|t| t.unix_timestamp()),
    }
}
