//! Storage contract of the delivery pipeline.
//!
//! The pipeline only talks to storage through [`WebhookStore`]. The
//! PostgreSQL implementation lives in [`postgres`]; tests use an in-memory
//! one.

pub mod postgres;

#[cfg(test)]
pub(crate) mod memory;

use crate::entities::collections::Collection;
use crate::entities::documents::Document;
use crate::entities::file_operations::FileOperation;
use crate::entities::groups::Group;
use crate::entities::integrations::Integration;
use crate::entities::memberships::{CollectionGroup, CollectionUser, GroupUser};
use crate::entities::pins::Pin;
use crate::entities::revisions::Revision;
use crate::entities::shares::Share;
use crate::entities::stars::Star;
use crate::entities::teams::TeamWithDomains;
use crate::entities::users::User;
use crate::entities::views::ViewWithUser;
use crate::entities::webhook_deliveries::FinalizeWebhookDelivery;
use crate::entities::{WebhookDelivery, WebhookSubscription};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use postgres::PgWebhookStore;

/// Errors returned by a [`WebhookStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("delivery not found: {0}")]
    DeliveryNotFound(Uuid),
}

/// A user's membership in a collection, with both sides resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionUserRelation {
    pub membership: CollectionUser,
    pub collection: Option<Collection>,
    pub user: Option<User>,
}

/// A group's membership in a collection, with both sides resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionGroupRelation {
    pub membership: CollectionGroup,
    pub collection: Option<Collection>,
    pub group: Option<Group>,
}

/// A user's membership in a group, with both sides resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupUserRelation {
    pub membership: GroupUser,
    pub group: Option<Group>,
    pub user: Option<User>,
}

/// Everything the delivery pipeline reads and writes.
///
/// Entity readers include soft-deleted rows. Each write is a single-row
/// operation; implementations need no locking beyond what storage provides.
#[async_trait]
pub trait WebhookStore: Send + Sync {
    // -- Subscriptions ------------------------------------------------------

    /// Find a live (not soft-deleted) subscription.
    async fn find_subscription(&self, id: Uuid) -> Result<Option<WebhookSubscription>, StoreError>;

    /// Set `enabled = false`. Idempotent.
    async fn disable_subscription(&self, id: Uuid) -> Result<(), StoreError>;

    // -- Ledger -------------------------------------------------------------

    /// Insert a `pending` delivery row.
    async fn create_delivery(&self, subscription_id: Uuid) -> Result<WebhookDelivery, StoreError>;

    /// Apply the outcome of an attempt to its row.
    async fn finalize_delivery(
        &self,
        update: FinalizeWebhookDelivery,
    ) -> Result<WebhookDelivery, StoreError>;

    /// Deliveries of a subscription, newest first.
    async fn list_deliveries(
        &self,
        subscription_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WebhookDelivery>, StoreError>;

    /// The `limit` most recent deliveries of a subscription.
    async fn recent_deliveries(
        &self,
        subscription_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WebhookDelivery>, StoreError> {
        self.list_deliveries(subscription_id, limit, 0).await
    }

    // -- Entities -----------------------------------------------------------

    async fn find_document(&self, id: Uuid) -> Result<Option<Document>, StoreError>;
    async fn find_revision(&self, id: Uuid) -> Result<Option<Revision>, StoreError>;
    async fn find_file_operation(&self, id: Uuid) -> Result<Option<FileOperation>, StoreError>;
    async fn find_collection(&self, id: Uuid) -> Result<Option<Collection>, StoreError>;
    async fn find_group(&self, id: Uuid) -> Result<Option<Group>, StoreError>;
    async fn find_integration(&self, id: Uuid) -> Result<Option<Integration>, StoreError>;
    async fn find_pin(&self, id: Uuid) -> Result<Option<Pin>, StoreError>;
    async fn find_star(&self, id: Uuid) -> Result<Option<Star>, StoreError>;
    async fn find_share(&self, id: Uuid) -> Result<Option<Share>, StoreError>;
    async fn find_view(&self, id: Uuid) -> Result<Option<ViewWithUser>, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_team(&self, id: Uuid) -> Result<Option<TeamWithDomains>, StoreError>;

    /// Like [`find_subscription`](WebhookStore::find_subscription) but also
    /// returns soft-deleted subscriptions.
    async fn find_webhook_subscription(
        &self,
        id: Uuid,
    ) -> Result<Option<WebhookSubscription>, StoreError>;

    async fn find_collection_user(
        &self,
        collection_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CollectionUserRelation>, StoreError>;

    async fn find_collection_group(
        &self,
        collection_id: Uuid,
        group_id: Uuid,
    ) -> Result<Option<CollectionGroupRelation>, StoreError>;

    async fn find_group_user(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupUserRelation>, StoreError>;
}
