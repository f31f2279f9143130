//! Disables subscriptions whose endpoint keeps failing.
//!
//! Runs after every failed attempt. When the last [`FAILURE_WINDOW`]
//! deliveries of a subscription all failed, the subscription is disabled.
//! Nothing here ever re-enables a subscription or touches queued tasks.

use crate::entities::{WebhookDeliveryStatus, WebhookSubscription};
use crate::store::{StoreError, WebhookStore};
use tracing::warn;

/// Consecutive failures that disable a subscription.
pub const FAILURE_WINDOW: usize = 25;

/// True iff `recent` is a full window of failures.
///
/// `recent` holds the newest deliveries first, at most [`FAILURE_WINDOW`]
/// of them. A shorter history never trips.
pub fn is_saturated(recent: &[WebhookDeliveryStatus]) -> bool {
    recent.len() == FAILURE_WINDOW
        && recent
            .iter()
            .all(|status| *status == WebhookDeliveryStatus::Failed)
}

/// Check the recent history of `subscription` and disable it if saturated.
///
/// Returns whether this call disabled it. Two concurrent evaluations may
/// both disable; the update is idempotent.
pub async fn evaluate(
    store: &dyn WebhookStore,
    subscription: &WebhookSubscription,
) -> Result<bool, StoreError> {
    let recent = store
        .recent_deliveries(subscription.id, FAILURE_WINDOW as i64)
        .await?;
    let statuses: Vec<WebhookDeliveryStatus> = recent.iter().map(|d| d.status).collect();

    if !is_saturated(&statuses) {
        return Ok(false);
    }

    store.disable_subscription(subscription.id).await?;
    warn!(
        subscription_id = %subscription.id,
        url = %subscription.url,
        window = FAILURE_WINDOW,
        "Disabled webhook subscription after consecutive failed deliveries"
    );
    Ok(true)
}
