//! Runtime configuration types.
//!
//! These are the validated, in-memory forms of the config file. Reading and
//! parsing the file is the server crate's job.

mod admin;
mod config_store;
mod delivery;

pub use admin::AdminConfig;
pub use config_store::{ConfigStore, ConfigWatcher};
pub use delivery::DeliveryConfig;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// HTTP server settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

/// Configuration shared between request handlers, the delivery worker and
/// the reload handler.
///
/// Sections read per request sit behind their own lock. The delivery
/// section is a [`ConfigStore`] because the worker rebuilds its HTTP client
/// when it changes.
#[derive(Clone)]
pub struct SharedConfig {
    pub server: Arc<RwLock<ServerConfig>>,
    pub admin: Arc<RwLock<AdminConfig>>,
    pub delivery: ConfigStore<DeliveryConfig>,
}

impl SharedConfig {
    pub fn new(server: ServerConfig, admin: AdminConfig, delivery: DeliveryConfig) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            admin: Arc::new(RwLock::new(admin)),
            delivery: ConfigStore::new(delivery),
        }
    }
}
