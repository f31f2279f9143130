pub mod admin;
pub mod event;
pub mod models;
pub mod webhook;

pub use admin::{
    AdminDeliveryResponse, AdminSubscriptionResponse, DeliverWebhookRequest,
    DeliverWebhookResponse, ListDeliveriesQuery,
};
pub use event::{Event, EventName, UnknownEventName};
pub use webhook::{DeliveryStatus, PayloadModel, WebhookEnvelope, WebhookPayload};
