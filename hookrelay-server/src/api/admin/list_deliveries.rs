use axum::{
    Json,
    extract::{Path, Query},
    response::IntoResponse,
};
use hookrelay_sdk::objects::admin::{AdminDeliveryResponse, ListDeliveriesQuery, clamp_pagination};
use uuid::Uuid;

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::AdminApiError;

/// `GET /subscriptions/{subscription_id}/deliveries`: the delivery log of
/// one subscription, newest first.
///
/// An unknown subscription yields an empty list.
pub async fn list_deliveries(
    state: axum::extract::State<AppState>,
    _auth: AdminAuth,
    Path(subscription_id): Path<Uuid>,
    Query(query): Query<ListDeliveriesQuery>,
) -> Result<impl IntoResponse, AdminApiError> {
    let (limit, offset) = clamp_pagination(query.limit, query.offset);

    let deliveries = state
        .store
        .list_deliveries(subscription_id, limit, offset)
        .await
        .map_err(AdminApiError::Store)?;

    let response: Vec<AdminDeliveryResponse> =
        deliveries.iter().map(AdminDeliveryResponse::from).collect();
    Ok(Json(response))
}
