//! Admin API request and response types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::event::Event;
use super::webhook::DeliveryStatus;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /tasks/deliver-webhook`, sent by the task scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverWebhookRequest {
    pub subscription_id: Uuid,
    pub event: Event,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Result of `POST /tasks/deliver-webhook`.
///
/// Endpoint failures are reported here with `status: "failed"`; only
/// task-level errors change the HTTP status of the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverWebhookResponse {
    /// The event produces no webhook. Nothing was sent or recorded.
    pub ignored: bool,
    pub delivery_id: Option<Uuid>,
    pub status: Option<DeliveryStatus>,
    pub status_code: Option<u16>,
    /// The attempt tripped the breaker and the subscription is now disabled.
    pub subscription_disabled: bool,
}

/// Subscription detail for the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSubscriptionResponse {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub url: String,
    pub enabled: bool,
    pub events: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

/// One row of the delivery audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDeliveryResponse {
    pub id: Uuid,
    pub webhook_subscription_id: Uuid,
    pub status: DeliveryStatus,
    pub status_code: Option<i32>,
    pub request_body: Option<serde_json::Value>,
    pub request_headers: Option<BTreeMap<String, String>>,
    pub response_body: Option<String>,
    pub response_headers: Option<BTreeMap<String, String>>,
    pub created_at: i64,
    pub updated_at: i64,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

const DEFAULT_LIMIT: i64 = 25;
const MAX_LIMIT: i64 = 200;
const MAX_OFFSET: i64 = 100_000;

/// Query parameters for listing deliveries of a subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct ListDeliveriesQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Clamp limit and offset to safe maximums.
pub fn clamp_pagination(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, MAX_LIMIT), offset.clamp(0, MAX_OFFSET))
}
