use axum::{Json, extract::Path, response::IntoResponse};
use uuid::Uuid;

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::{AdminApiError, subscription_to_admin_response};

/// `GET /subscriptions/{subscription_id}`: show one subscription.
///
/// Soft-deleted subscriptions are shown too, with `deleted_at` set, so a
/// delivery log can always be traced back to its endpoint.
pub async fn show_subscription(
    state: axum::extract::State<AppState>,
    _auth: AdminAuth,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, AdminApiError> {
    let subscription = state
        .store
        .find_webhook_subscription(subscription_id)
        .await
        .map_err(AdminApiError::Store)?
        .ok_or(AdminApiError::NotFound)?;

    Ok(Json(subscription_to_admin_response(&subscription)))
}
