//! Database rows and the SQL processors that read and write them.
//!
//! Every domain lookup here ignores `deleted_at`: a webhook about a deleted
//! or archived entity still reports the entity's last known state.

pub mod collections;
pub mod documents;
pub mod file_operations;
pub mod groups;
pub mod integrations;
pub mod memberships;
pub mod pins;
pub mod revisions;
pub mod shares;
pub mod stars;
pub mod teams;
pub mod users;
pub mod views;
pub mod webhook_deliveries;
pub mod webhook_subscriptions;

pub use webhook_deliveries::{Headers, WebhookDelivery, WebhookDeliveryStatus};
pub use webhook_subscriptions::WebhookSubscription;
