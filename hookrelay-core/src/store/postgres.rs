//! [`WebhookStore`] backed by PostgreSQL through the SQL processors in
//! [`crate::entities`].

use super::{
    CollectionGroupRelation, CollectionUserRelation, GroupUserRelation, StoreError, WebhookStore,
};
use crate::entities::collections::{Collection, GetCollectionById};
use crate::entities::documents::{Document, GetDocumentById};
use crate::entities::file_operations::{FileOperation, GetFileOperationById};
use crate::entities::groups::{GetGroupById, Group};
use crate::entities::integrations::{GetIntegrationById, Integration};
use crate::entities::memberships::{GetCollectionGroup, GetCollectionUser, GetGroupUser};
use crate::entities::pins::{GetPinById, Pin};
use crate::entities::revisions::{GetRevisionById, Revision};
use crate::entities::shares::{GetShareById, Share};
use crate::entities::stars::{GetStarById, Star};
use crate::entities::teams::{GetTeamById, ListTeamDomains, TeamWithDomains};
use crate::entities::users::{GetUserById, User};
use crate::entities::views::{GetViewById, ViewWithUser};
use crate::entities::webhook_deliveries::{
    CreateWebhookDelivery, FinalizeWebhookDelivery, ListWebhookDeliveries,
};
use crate::entities::webhook_subscriptions::{
    DisableWebhookSubscription, GetWebhookSubscriptionById,
};
use crate::entities::{WebhookDelivery, WebhookSubscription};
use crate::framework::DatabaseProcessor;
use async_trait::async_trait;
use kanau::processor::Processor;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PgWebhookStore {
    db: DatabaseProcessor,
}

impl PgWebhookStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            db: DatabaseProcessor { pool },
        }
    }

    async fn subscription(
        &self,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<WebhookSubscription>, StoreError> {
        Ok(self
            .db
            .process(GetWebhookSubscriptionById {
                subscription_id: id,
                include_deleted,
            })
            .await?)
    }
}

#[async_trait]
impl WebhookStore for PgWebhookStore {
    async fn find_subscription(&self, id: Uuid) -> Result<Option<WebhookSubscription>, StoreError> {
        self.subscription(id, false).await
    }

    async fn disable_subscription(&self, id: Uuid) -> Result<(), StoreError> {
        self.db
            .process(DisableWebhookSubscription {
                subscription_id: id,
            })
            .await?;
        Ok(())
    }

    async fn create_delivery(&self, subscription_id: Uuid) -> Result<WebhookDelivery, StoreError> {
        Ok(self
            .db
            .process(CreateWebhookDelivery { subscription_id })
            .await?)
    }

    async fn finalize_delivery(
        &self,
        update: FinalizeWebhookDelivery,
    ) -> Result<WebhookDelivery, StoreError> {
        let delivery_id = update.delivery_id;
        self.db.process(update).await.map_err(|e| match e {
            sqlx::Error::RowNotFound => StoreError::DeliveryNotFound(delivery_id),
            other => StoreError::Database(other),
        })
    }

    async fn list_deliveries(
        &self,
        subscription_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WebhookDelivery>, StoreError> {
        Ok(self
            .db
            .process(ListWebhookDeliveries {
                subscription_id,
                limit,
                offset,
            })
            .await?)
    }

    async fn find_document(&self, id: Uuid) -> Result<Option<Document>, StoreError> {
        Ok(self.db.process(GetDocumentById { document_id: id }).await?)
    }

    async fn find_revision(&self, id: Uuid) -> Result<Option<Revision>, StoreError> {
        Ok(self.db.process(GetRevisionById { revision_id: id }).await?)
    }

    async fn find_file_operation(&self, id: Uuid) -> Result<Option<FileOperation>, StoreError> {
        Ok(self
            .db
            .process(GetFileOperationById {
                file_operation_id: id,
            })
            .await?)
    }

    async fn find_collection(&self, id: Uuid) -> Result<Option<Collection>, StoreError> {
        Ok(self
            .db
            .process(GetCollectionById { collection_id: id })
            .await?)
    }

    async fn find_group(&self, id: Uuid) -> Result<Option<Group>, StoreError> {
        Ok(self.db.process(GetGroupById { group_id: id }).await?)
    }

    async fn find_integration(&self, id: Uuid) -> Result<Option<Integration>, StoreError> {
        Ok(self
            .db
            .process(GetIntegrationById { integration_id: id })
            .await?)
    }

    async fn find_pin(&self, id: Uuid) -> Result<Option<Pin>, StoreError> {
        Ok(self.db.process(GetPinById { pin_id: id }).await?)
    }

    async fn find_star(&self, id: Uuid) -> Result<Option<Star>, StoreError> {
        Ok(self.db.process(GetStarById { star_id: id }).await?)
    }

    async fn find_share(&self, id: Uuid) -> Result<Option<Share>, StoreError> {
        Ok(self.db.process(GetShareById { share_id: id }).await?)
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<ViewWithUser>, StoreError> {
        let Some(view) = self.db.process(GetViewById { view_id: id }).await? else {
            return Ok(None);
        };
        let user = self.find_user(view.user_id).await?;
        Ok(Some(ViewWithUser { view, user }))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.db.process(GetUserById { user_id: id }).await?)
    }

    async fn find_team(&self, id: Uuid) -> Result<Option<TeamWithDomains>, StoreError> {
        let Some(team) = self.db.process(GetTeamById { team_id: id }).await? else {
            return Ok(None);
        };
        let allowed_domains = self.db.process(ListTeamDomains { team_id: id }).await?;
        Ok(Some(TeamWithDomains {
            team,
            allowed_domains,
        }))
    }

    async fn find_webhook_subscription(
        &self,
        id: Uuid,
    ) -> Result<Option<WebhookSubscription>, StoreError> {
        self.subscription(id, true).await
    }

    async fn find_collection_user(
        &self,
        collection_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CollectionUserRelation>, StoreError> {
        let Some(membership) = self
            .db
            .process(GetCollectionUser {
                collection_id,
                user_id,
            })
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(CollectionUserRelation {
            membership,
            collection: self.find_collection(collection_id).await?,
            user: self.find_user(user_id).await?,
        }))
    }

    async fn find_collection_group(
        &self,
        collection_id: Uuid,
        group_id: Uuid,
    ) -> Result<Option<CollectionGroupRelation>, StoreError> {
        let Some(membership) = self
            .db
            .process(GetCollectionGroup {
                collection_id,
                group_id,
            })
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(CollectionGroupRelation {
            membership,
            collection: self.find_collection(collection_id).await?,
            group: self.find_group(group_id).await?,
        }))
    }

    async fn find_group_user(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupUserRelation>, StoreError> {
        let Some(membership) = self
            .db
            .process(GetGroupUser { group_id, user_id })
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(GroupUserRelation {
            membership,
            group: self.find_group(group_id).await?,
            user: self.find_user(user_id).await?,
        }))
    }
}
