//! In-memory [`WebhookStore`] for tests.

use super::{
    CollectionGroupRelation, CollectionUserRelation, GroupUserRelation, StoreError, WebhookStore,
};
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
use crate::entities::views::{View, ViewWithUser};
use crate::entities::webhook_deliveries::FinalizeWebhookDelivery;
use crate::entities::{WebhookDelivery, WebhookDeliveryStatus, WebhookSubscription};
use async_trait::async_trait;
use sqlx::types::Json;
use std::collections::HashMap;
use std::sync::Mutex;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    subscriptions: HashMap<Uuid, WebhookSubscription>,
    /// Insertion order doubles as creation order.
    deliveries: Vec<WebhookDelivery>,
    documents: HashMap<Uuid, Document>,
    revisions: HashMap<Uuid, Revision>,
    file_operations: HashMap<Uuid, FileOperation>,
    collections: HashMap<Uuid, Collection>,
    groups: HashMap<Uuid, Group>,
    integrations: HashMap<Uuid, Integration>,
    pins: HashMap<Uuid, Pin>,
    stars: HashMap<Uuid, Star>,
    shares: HashMap<Uuid, Share>,
    views: HashMap<Uuid, View>,
    users: HashMap<Uuid, User>,
    teams: HashMap<Uuid, TeamWithDomains>,
    collection_users: HashMap<(Uuid, Uuid), CollectionUser>,
    collection_groups: HashMap<(Uuid, Uuid), CollectionGroup>,
    group_users: HashMap<(Uuid, Uuid), GroupUser>,
    finalize_calls: usize,
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut tables = self.tables.lock().unwrap();
        f(&mut tables)
    }

    pub(crate) fn insert_subscription(&self, sub: WebhookSubscription) {
        self.with(|t| t.subscriptions.insert(sub.id, sub));
    }

    pub(crate) fn subscription(&self, id: Uuid) -> Option<WebhookSubscription> {
        self.with(|t| t.subscriptions.get(&id).cloned())
    }

    /// All deliveries, oldest first.
    pub(crate) fn deliveries(&self) -> Vec<WebhookDelivery> {
        self.with(|t| t.deliveries.clone())
    }

    pub(crate) fn finalize_calls(&self) -> usize {
        self.with(|t| t.finalize_calls)
    }

    /// Append a finished delivery directly, bypassing the pipeline.
    pub(crate) fn push_delivery(&self, subscription_id: Uuid, status: WebhookDeliveryStatus) {
        self.with(|t| {
            let now = OffsetDateTime::now_utc();
            t.deliveries.push(WebhookDelivery {
                id: Uuid::new_v4(),
                webhook_subscription_id: subscription_id,
                status,
                status_code: None,
                request_body: None,
                request_headers: None,
                response_body: None,
                response_headers: None,
                created_at: now,
                updated_at: now,
            });
        });
    }

    pub(crate) fn insert_document(&self, doc: Document) {
        self.with(|t| t.documents.insert(doc.id, doc));
    }

    pub(crate) fn insert_revision(&self, revision: Revision) {
        self.with(|t| t.revisions.insert(revision.id, revision));
    }

    pub(crate) fn insert_file_operation(&self, op: FileOperation) {
        self.with(|t| t.file_operations.insert(op.id, op));
    }

    pub(crate) fn insert_collection(&self, collection: Collection) {
        self.with(|t| t.collections.insert(collection.id, collection));
    }

    pub(crate) fn insert_group(&self, group: Group) {
        self.with(|t| t.groups.insert(group.id, group));
    }

    pub(crate) fn insert_integration(&self, integration: Integration) {
        self.with(|t| t.integrations.insert(integration.id, integration));
    }

    pub(crate) fn insert_pin(&self, pin: Pin) {
        self.with(|t| t.pins.insert(pin.id, pin));
    }

    pub(crate) fn insert_star(&self, star: Star) {
        self.with(|t| t.stars.insert(star.id, star));
    }

    pub(crate) fn insert_share(&self, share: Share) {
        self.with(|t| t.shares.insert(share.id, share));
    }

    pub(crate) fn insert_user(&self, user: User) {
        self.with(|t| t.users.insert(user.id, user));
    }

    pub(crate) fn insert_team(&self, team: TeamWithDomains) {
        self.with(|t| t.teams.insert(team.team.id, team));
    }

    pub(crate) fn insert_view(&self, view: View) {
        self.with(|t| t.views.insert(view.id, view));
    }

    pub(crate) fn insert_collection_user(&self, m: CollectionUser) {
        self.with(|t| t.collection_users.insert((m.collection_id, m.user_id), m));
    }

    pub(crate) fn insert_collection_group(&self, m: CollectionGroup) {
        self.with(|t| t.collection_groups.insert((m.collection_id, m.group_id), m));
    }

    pub(crate) fn insert_group_user(&self, m: GroupUser) {
        self.with(|t| t.group_users.insert((m.group_id, m.user_id), m));
    }
}

#[async_trait]
impl WebhookStore for MemoryStore {
    async fn find_subscription(&self, id: Uuid) -> Result<Option<WebhookSubscription>, StoreError> {
        Ok(self.with(|t| {
            t.subscriptions
                .get(&id)
                .filter(|s| s.deleted_at.is_none())
                .cloned()
        }))
    }

    async fn disable_subscription(&self, id: Uuid) -> Result<(), StoreError> {
        self.with(|t| {
            if let Some(sub) = t.subscriptions.get_mut(&id) {
                sub.enabled = false;
                sub.updated_at = OffsetDateTime::now_utc();
            }
        });
        Ok(())
    }

    async fn create_delivery(&self, subscription_id: Uuid) -> Result<WebhookDelivery, StoreError> {
        Ok(self.with(|t| {
            let now = OffsetDateTime::now_utc();
            let delivery = WebhookDelivery {
                id: Uuid::now_v7(),
                webhook_subscription_id: subscription_id,
                status: WebhookDeliveryStatus::Pending,
                status_code: None,
                request_body: None,
                request_headers: None,
                response_body: None,
                response_headers: None,
                created_at: now,
                updated_at: now,
            };
            t.deliveries.push(delivery.clone());
            delivery
        }))
    }

    async fn finalize_delivery(
        &self,
        update: FinalizeWebhookDelivery,
    ) -> Result<WebhookDelivery, StoreError> {
        self.with(|t| {
            t.finalize_calls += 1;
            let delivery = t
                .deliveries
                .iter_mut()
                .find(|d| d.id == update.delivery_id)
                .ok_or(StoreError::DeliveryNotFound(update.delivery_id))?;
            delivery.status = update.status;
            delivery.status_code = update.status_code;
            delivery.request_body = update.request_body.map(Json);
            delivery.request_headers = Some(Json(update.request_headers));
            delivery.response_body = Some(update.response_body);
            delivery.response_headers = Some(Json(update.response_headers));
            delivery.updated_at = OffsetDateTime::now_utc();
            Ok(delivery.clone())
        })
    }

    async fn list_deliveries(
        &self,
        subscription_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WebhookDelivery>, StoreError> {
        Ok(self.with(|t| {
            t.deliveries
                .iter()
                .rev()
                .filter(|d| d.webhook_subscription_id == subscription_id)
                .skip(offset.max(0) as usize)
                .take(limit.max(0) as usize)
                .cloned()
                .collect()
        }))
    }

    async fn find_document(&self, id: Uuid) -> Result<Option<Document>, StoreError> {
        Ok(self.with(|t| t.documents.get(&id).cloned()))
    }

    async fn find_revision(&self, id: Uuid) -> Result<Option<Revision>, StoreError> {
        Ok(self.with(|t| t.revisions.get(&id).cloned()))
    }

    async fn find_file_operation(&self, id: Uuid) -> Result<Option<FileOperation>, StoreError> {
        Ok(self.with(|t| t.file_operations.get(&id).cloned()))
    }

    async fn find_collection(&self, id: Uuid) -> Result<Option<Collection>, StoreError> {
        Ok(self.with(|t| t.collections.get(&id).cloned()))
    }

    async fn find_group(&self, id: Uuid) -> Result<Option<Group>, StoreError> {
        Ok(self.with(|t| t.groups.get(&id).cloned()))
    }

    async fn find_integration(&self, id: Uuid) -> Result<Option<Integration>, StoreError> {
        Ok(self.with(|t| t.integrations.get(&id).cloned()))
    }

    async fn find_pin(&self, id: Uuid) -> Result<Option<Pin>, StoreError> {
        Ok(self.with(|t| t.pins.get(&id).cloned()))
    }

    async fn find_star(&self, id: Uuid) -> Result<Option<Star>, StoreError> {
        Ok(self.with(|t| t.stars.get(&id).cloned()))
    }

    async fn find_share(&self, id: Uuid) -> Result<Option<Share>, StoreError> {
        Ok(self.with(|t| t.shares.get(&id).cloned()))
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<ViewWithUser>, StoreError> {
        Ok(self.with(|t| {
            t.views.get(&id).cloned().map(|view| ViewWithUser {
                user: t.users.get(&view.user_id).cloned(),
                view,
            })
        }))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.with(|t| t.users.get(&id).cloned()))
    }

    async fn find_team(&self, id: Uuid) -> Result<Option<TeamWithDomains>, StoreError> {
        Ok(self.with(|t| t.teams.get(&id).cloned()))
    }

    async fn find_webhook_subscription(
        &self,
        id: Uuid,
    ) -> Result<Option<WebhookSubscription>, StoreError> {
        Ok(self.with(|t| t.subscriptions.get(&id).cloned()))
    }

    async fn find_collection_user(
        &self,
        collection_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CollectionUserRelation>, StoreError> {
        Ok(self.with(|t| {
            t.collection_users
                .get(&(collection_id, user_id))
                .cloned()
                .map(|membership| CollectionUserRelation {
                    membership,
                    collection: t.collections.get(&collection_id).cloned(),
                    user: t.users.get(&user_id).cloned(),
                })
        }))
    }

    async fn find_collection_group(
        &self,
        collection_id: Uuid,
        group_id: Uuid,
    ) -> Result<Option<CollectionGroupRelation>, StoreError> {
        Ok(self.with(|t| {
            t.collection_groups
                .get(&(collection_id, group_id))
                .cloned()
                .map(|membership| CollectionGroupRelation {
                    membership,
                    collection: t.collections.get(&collection_id).cloned(),
                    group: t.groups.get(&group_id).cloned(),
                })
        }))
    }

    async fn find_group_user(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupUserRelation>, StoreError> {
        Ok(self.with(|t| {
            t.group_users
                .get(&(group_id, user_id))
                .cloned()
                .map(|membership| GroupUserRelation {
                    membership,
                    group: t.groups.get(&group_id).cloned(),
                    user: t.users.get(&user_id).cloned(),
                })
        }))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn subscription(url: &str) -> WebhookSubscription {
        let now = OffsetDateTime::now_utc();
        WebhookSubscription {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            created_by_id: Uuid::new_v4(),
            name: "Test hook".to_string(),
            url: url.to_string(),
            enabled: true,
            events: vec![],
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub(crate) fn user(name: &str) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            name: name.to_string(),
            email: Some(format!("{}@example.test", name.to_lowercase())),
            avatar_url: None,
            role: "member".to_string(),
            suspended_at: None,
            last_active_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub(crate) fn document(title: &str) -> Document {
        let now = OffsetDateTime::now_utc();
        let author = Uuid::new_v4();
        Document {
            id: Uuid::new_v4(),
            url_id: "aBcD1234".to_string(),
            team_id: Uuid::new_v4(),
            collection_id: Some(Uuid::new_v4()),
            parent_document_id: None,
            title: title.to_string(),
            text: "Hello".to_string(),
            emoji: None,
            created_by_id: author,
            updated_by_id: author,
            template: false,
            full_width: false,
            revision_count: 1,
            created_at: now,
            updated_at: now,
            published_at: Some(now),
            archived_at: None,
            deleted_at: None,
        }
    }

    pub(crate) fn collection(name: &str) -> Collection {
        let now = OffsetDateTime::now_utc();
        Collection {
            id: Uuid::new_v4(),
            url_id: "cOlL1234".to_string(),
            team_id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            color: Some("#4E5C6E".to_string()),
            icon: None,
            permission: Some("read_write".to_string()),
            sharing: true,
            index: Some("P".to_string()),
            created_at: now,
            updated_at: now,
            archived_at: None,
            deleted_at: None,
        }
    }

    pub(crate) fn group(name: &str) -> Group {
        let now = OffsetDateTime::now_utc();
        Group {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            name: name.to_string(),
            member_count: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
