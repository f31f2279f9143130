//! Application state shared across all request handlers.

use hookrelay_core::config::SharedConfig;
use hookrelay_core::events::DeliverWebhookSender;
use hookrelay_core::store::WebhookStore;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Storage seam shared by the delivery pipeline and the admin API.
    pub store: Arc<dyn WebhookStore>,
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// Feeds the delivery worker.
    pub task_tx: DeliverWebhookSender,
}

impl AppState {
    pub fn new(
        store: Arc<dyn WebhookStore>,
        config: SharedConfig,
        task_tx: DeliverWebhookSender,
    ) -> Self {
        Self {
            store,
            config,
            task_tx,
        }
    }
}
