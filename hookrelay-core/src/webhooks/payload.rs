//! Payload builders, one per [`HandlerFamily`].
//!
//! A builder reads the entity an event refers to and turns it into a
//! [`WebhookPayload`]. Builders only read, so a failed task can rebuild the
//! same payload on retry.
//!
//! Lookups include soft-deleted rows, so deleting something still reports
//! its last state. A row that is gone entirely yields `model: null`, which
//! is still delivered.

use super::classifier::HandlerFamily;
use super::task::DeliveryError;
use crate::entities::memberships::composite_id;
use crate::store::WebhookStore;
use async_trait::async_trait;
use hookrelay_sdk::objects::models::{
    CollectionGroupMembershipModel, CollectionModel, DocumentModel, FileOperationModel,
    GroupMembershipModel, GroupModel, IntegrationModel, MembershipModel, PinModel,
    RevisionModel, ShareModel, StarModel, TeamModel, UserModel, ViewModel,
    WebhookSubscriptionModel,
};
use hookrelay_sdk::objects::{Event, PayloadModel, WebhookPayload};
use uuid::Uuid;

/// Builds the payload for one family of events.
#[async_trait]
pub trait PayloadBuilder: Send + Sync {
    async fn build(
        &self,
        store: &dyn WebhookStore,
        event: &Event,
    ) -> Result<WebhookPayload, DeliveryError>;
}

impl HandlerFamily {
    /// The builder for this family.
    pub fn builder(&self) -> &'static dyn PayloadBuilder {
        match self {
            HandlerFamily::Users => &UsersPayload,
            HandlerFamily::Documents => &DocumentsPayload,
            HandlerFamily::Revisions => &RevisionsPayload,
            HandlerFamily::FileOperations => &FileOperationsPayload,
            HandlerFamily::Collections => &CollectionsPayload,
            HandlerFamily::CollectionMemberships => &CollectionMembershipsPayload,
            HandlerFamily::CollectionGroupMemberships => &CollectionGroupMembershipsPayload,
            HandlerFamily::Groups => &GroupsPayload,
            HandlerFamily::GroupMemberships => &GroupMembershipsPayload,
            HandlerFamily::Integrations => &IntegrationsPayload,
            HandlerFamily::Teams => &TeamsPayload,
            HandlerFamily::Pins => &PinsPayload,
            HandlerFamily::Stars => &StarsPayload,
            HandlerFamily::Shares => &SharesPayload,
            HandlerFamily::WebhookSubscriptions => &WebhookSubscriptionsPayload,
            HandlerFamily::Views => &ViewsPayload,
        }
    }
}

fn require(event: &Event, id: Option<Uuid>, field: &'static str) -> Result<Uuid, DeliveryError> {
    id.ok_or_else(|| DeliveryError::MissingReference {
        event: event.name.clone(),
        field,
    })
}

fn snapshot<'a, R, M>(row: Option<&'a R>) -> Option<PayloadModel>
where
    M: From<&'a R>,
    PayloadModel: From<M>,
{
    row.map(|r| PayloadModel::from(M::from(r)))
}

// ---------------------------------------------------------------------------
// Single-entity families: `{ id, model }`
// ---------------------------------------------------------------------------

macro_rules! single_entity_builder {
    ($(#[$meta:meta])* $name:ident, $field:ident, $finder:ident, $model:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        #[async_trait]
        impl PayloadBuilder for $name {
            async fn build(
                &self,
                store: &dyn WebhookStore,
                event: &Event,
            ) -> Result<WebhookPayload, DeliveryError> {
                let id = require(event, event.$field, stringify!($field))?;
                let row = store.$finder(id).await?;
                Ok(WebhookPayload::new(
                    id.to_string(),
                    snapshot::<_, $model>(row.as_ref()),
                ))
            }
        }
    };
}

single_entity_builder!(
    /// `users.*`, keyed by `userId`.
    UsersPayload, user_id, find_user, UserModel
);
single_entity_builder!(
    /// `documents.*`, keyed by `documentId`.
    DocumentsPayload, document_id, find_document, DocumentModel
);
single_entity_builder!(RevisionsPayload, model_id, find_revision, RevisionModel);
single_entity_builder!(
    FileOperationsPayload,
    model_id,
    find_file_operation,
    FileOperationModel
);
single_entity_builder!(
    /// `collections.*` except membership changes, keyed by `collectionId`.
    CollectionsPayload, collection_id, find_collection, CollectionModel
);
single_entity_builder!(GroupsPayload, model_id, find_group, GroupModel);
single_entity_builder!(
    IntegrationsPayload,
    model_id,
    find_integration,
    IntegrationModel
);
single_entity_builder!(
    /// `teams.update`, keyed by `teamId`. The snapshot lists the team's
    /// allowed sign-in domains.
    TeamsPayload, team_id, find_team, TeamModel
);
single_entity_builder!(PinsPayload, model_id, find_pin, PinModel);
single_entity_builder!(StarsPayload, model_id, find_star, StarModel);
single_entity_builder!(SharesPayload, model_id, find_share, ShareModel);
single_entity_builder!(
    WebhookSubscriptionsPayload,
    model_id,
    find_webhook_subscription,
    WebhookSubscriptionModel
);
single_entity_builder!(
    /// `views.create`. The snapshot embeds the viewing user.
    ViewsPayload, model_id, find_view, ViewModel
);

// ---------------------------------------------------------------------------
// Relationship families: `{ id: "<child>-<parent>", model, <side>, <side> }`
// ---------------------------------------------------------------------------

/// `collections.add_user` / `collections.remove_user`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionMembershipsPayload;

#[async_trait]
impl PayloadBuilder for CollectionMembershipsPayload {
    async fn build(
        &self,
        store: &dyn WebhookStore,
        event: &Event,
    ) -> Result<WebhookPayload, DeliveryError> {
        let collection_id = require(event, event.collection_id, "collection_id")?;
        let user_id = require(event, event.user_id, "user_id")?;
        let relation = store.find_collection_user(collection_id, user_id).await?;

        let (model, collection, user) = match &relation {
            Some(r) => (
                snapshot::<_, MembershipModel>(Some(&r.membership)),
                snapshot::<_, CollectionModel>(r.collection.as_ref()),
                snapshot::<_, UserModel>(r.user.as_ref()),
            ),
            None => (None, None, None),
        };
        Ok(
            WebhookPayload::new(composite_id(user_id, collection_id), model)
                .with_related("collection", collection)
                .with_related("user", user),
        )
    }
}

/// `collections.add_group` / `collections.remove_group`. The group id
/// arrives as `modelId`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionGroupMembershipsPayload;

#[async_trait]
impl PayloadBuilder for CollectionGroupMembershipsPayload {
    async fn build(
        &self,
        store: &dyn WebhookStore,
        event: &Event,
    ) -> Result<WebhookPayload, DeliveryError> {
        let collection_id = require(event, event.collection_id, "collection_id")?;
        let group_id = require(event, event.model_id, "model_id")?;
        let relation = store.find_collection_group(collection_id, group_id).await?;

        let (model, collection, group) = match &relation {
            Some(r) => (
                snapshot::<_, CollectionGroupMembershipModel>(Some(&r.membership)),
                snapshot::<_, CollectionModel>(r.collection.as_ref()),
                snapshot::<_, GroupModel>(r.group.as_ref()),
            ),
            None => (None, None, None),
        };
        Ok(
            WebhookPayload::new(composite_id(group_id, collection_id), model)
                .with_related("collection", collection)
                .with_related("group", group),
        )
    }
}

/// `groups.add_user` / `groups.remove_user`. The group id arrives as
/// `modelId`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupMembershipsPayload;

#[async_trait]
impl PayloadBuilder for GroupMembershipsPayload {
    async fn build(
        &self,
        store: &dyn WebhookStore,
        event: &Event,
    ) -> Result<WebhookPayload, DeliveryError> {
        let group_id = require(event, event.model_id, "model_id")?;
        let user_id = require(event, event.user_id, "user_id")?;
        let relation = store.find_group_user(group_id, user_id).await?;

        let (model, group, user) = match &relation {
            Some(r) => (
                snapshot::<_, GroupMembershipModel>(Some(&r.membership)),
                snapshot::<_, GroupModel>(r.group.as_ref()),
                snapshot::<_, UserModel>(r.user.as_ref()),
            ),
            None => (None, None, None),
        };
        Ok(
            WebhookPayload::new(composite_id(user_id, group_id), model)
                .with_related("group", group)
                .with_related("user", user),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::file_operations::FileOperation;
    use crate::entities::integrations::Integration;
    use crate::entities::memberships::{CollectionGroup, CollectionUser, GroupUser};
    use crate::entities::pins::Pin;
    use crate::entities::revisions::Revision;
    use crate::entities::shares::Share;
    use crate::entities::stars::Star;
    use crate::entities::teams::{Team, TeamWithDomains};
    use crate::entities::views::View;
    use crate::store::memory::{MemoryStore, fixtures};
    use time::OffsetDateTime;

    #[tokio::test]
    async fn test_document_payload_uses_snapshot() {
        let store = MemoryStore::new();
        let doc = fixtures::document("Launch plan");
        store.insert_document(doc.clone());

        let event = Event::new("documents.publish").with_document(doc.id);
        let payload = DocumentsPayload.build(&store, &event).await.unwrap();

        assert_eq!(payload.id, doc.id.to_string());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["title"], "Launch plan");
        assert_eq!(json["model"]["id"], doc.id.to_string());
    }

    #[tokio::test]
    async fn test_soft_deleted_entity_keeps_last_snapshot() {
        let store = MemoryStore::new();
        let mut doc = fixtures::document("Old notes");
        doc.deleted_at = Some(OffsetDateTime::now_utc());
        store.insert_document(doc.clone());

        let event = Event::new("documents.delete").with_document(doc.id);
        let payload = DocumentsPayload.build(&store, &event).await.unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["title"], "Old notes");
        assert!(json["model"]["deletedAt"].is_string());
    }

    #[tokio::test]
    async fn test_missing_entity_yields_null_model() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let event = Event::new("groups.delete").with_model(id);

        let payload = HandlerFamily::Groups
            .builder()
            .build(&store, &event)
            .await
            .unwrap();

        assert_eq!(payload.id, id.to_string());
        assert!(payload.model.is_none());
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["model"].is_null());
    }

    #[tokio::test]
    async fn test_missing_reference_is_an_error() {
        let store = MemoryStore::new();
        let event = Event::new("documents.publish");

        let err = DocumentsPayload.build(&store, &event).await.unwrap_err();
        assert!(matches!(
            err,
            DeliveryError::MissingReference { field: "document_id", .. }
        ));
    }

    #[tokio::test]
    async fn test_collection_membership_payload() {
        let store = MemoryStore::new();
        let collection = fixtures::collection("Handbook");
        let user = fixtures::user("Ada");
        let now = OffsetDateTime::now_utc();
        store.insert_collection(collection.clone());
        store.insert_user(user.clone());
        store.insert_collection_user(CollectionUser {
            collection_id: collection.id,
            user_id: user.id,
            permission: "read".to_string(),
            created_at: now,
            updated_at: now,
        });

        let event = Event::new("collections.add_user")
            .with_collection(collection.id)
            .with_user(user.id);
        let payload = CollectionMembershipsPayload
            .build(&store, &event)
            .await
            .unwrap();

        let expected_id = format!("{}-{}", user.id, collection.id);
        assert_eq!(payload.id, expected_id);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["id"], expected_id);
        assert_eq!(json["model"]["permission"], "read");
        assert_eq!(json["collection"]["name"], "Handbook");
        assert_eq!(json["user"]["name"], "Ada");
    }

    #[tokio::test]
    async fn test_removed_membership_serializes_nulls() {
        let store = MemoryStore::new();
        let group_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let event = Event::new("groups.remove_user")
            .with_model(group_id)
            .with_user(user_id);
        let payload = GroupMembershipsPayload.build(&store, &event).await.unwrap();

        assert_eq!(payload.id, format!("{user_id}-{group_id}"));
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["model"].is_null());
        assert!(json["group"].is_null());
        assert!(json["user"].is_null());
    }

    #[tokio::test]
    async fn test_group_membership_with_deleted_user() {
        let store = MemoryStore::new();
        let group = fixtures::group("Design");
        let mut user = fixtures::user("Grace");
        user.deleted_at = Some(OffsetDateTime::now_utc());
        let now = OffsetDateTime::now_utc();
        store.insert_group(group.clone());
        store.insert_user(user.clone());
        store.insert_group_user(GroupUser {
            group_id: group.id,
            user_id: user.id,
            created_at: now,
            updated_at: now,
            deleted_at: Some(now),
        });

        let event = Event::new("groups.remove_user")
            .with_model(group.id)
            .with_user(user.id);
        let payload = HandlerFamily::GroupMemberships
            .builder()
            .build(&store, &event)
            .await
            .unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["groupId"], group.id.to_string());
        assert_eq!(json["group"]["name"], "Design");
        assert_eq!(json["user"]["name"], "Grace");
    }

    #[tokio::test]
    async fn test_team_payload_includes_allowed_domains() {
        let store = MemoryStore::new();
        let now = OffsetDateTime::now_utc();
        let team = Team {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            avatar_url: None,
            subdomain: Some("acme".to_string()),
            domain: None,
            sharing: true,
            member_collection_create: true,
            invite_required: false,
            default_user_role: "member".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        store.insert_team(TeamWithDomains {
            team: team.clone(),
            allowed_domains: vec!["acme.test".to_string()],
        });

        let event = Event::new("teams.update").with_team(team.id);
        let payload = TeamsPayload.build(&store, &event).await.unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["name"], "Acme");
        assert_eq!(json["model"]["allowedDomains"][0], "acme.test");
    }

    #[tokio::test]
    async fn test_view_payload_embeds_user() {
        let store = MemoryStore::new();
        let user = fixtures::user("Linus");
        let now = OffsetDateTime::now_utc();
        let view = View {
            id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            user_id: user.id,
            count: 3,
            created_at: now,
            updated_at: now,
        };
        store.insert_user(user);
        store.insert_view(view.clone());

        let event = Event::new("views.create").with_model(view.id);
        let payload = ViewsPayload.build(&store, &event).await.unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["count"], 3);
        assert_eq!(json["model"]["user"]["name"], "Linus");
    }

    #[tokio::test]
    async fn test_collection_group_membership_payload() {
        let store = MemoryStore::new();
        let collection = fixtures::collection("Runbooks");
        let group = fixtures::group("On-call");
        let now = OffsetDateTime::now_utc();
        store.insert_collection(collection.clone());
        store.insert_group(group.clone());
        store.insert_collection_group(CollectionGroup {
            collection_id: collection.id,
            group_id: group.id,
            permission: "read_write".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });

        let event = Event::new("collections.add_group")
            .with_collection(collection.id)
            .with_model(group.id);
        let payload = HandlerFamily::CollectionGroupMemberships
            .builder()
            .build(&store, &event)
            .await
            .unwrap();

        let expected_id = format!("{}-{}", group.id, collection.id);
        assert_eq!(payload.id, expected_id);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["id"], expected_id);
        assert_eq!(json["model"]["groupId"], group.id.to_string());
        assert_eq!(json["model"]["permission"], "read_write");
        assert_eq!(json["collection"]["name"], "Runbooks");
        assert_eq!(json["group"]["name"], "On-call");
        assert!(json.get("user").is_none());
    }

    #[tokio::test]
    async fn test_removed_collection_group_serializes_nulls() {
        let store = MemoryStore::new();
        let collection_id = Uuid::new_v4();
        let group_id = Uuid::new_v4();

        let event = Event::new("collections.remove_group")
            .with_collection(collection_id)
            .with_model(group_id);
        let payload = CollectionGroupMembershipsPayload
            .build(&store, &event)
            .await
            .unwrap();

        assert_eq!(payload.id, format!("{group_id}-{collection_id}"));
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["model"].is_null());
        assert!(json["collection"].is_null());
        assert!(json["group"].is_null());
    }

    #[tokio::test]
    async fn test_collection_group_needs_group_id() {
        let store = MemoryStore::new();
        let event = Event::new("collections.add_group").with_collection(Uuid::new_v4());

        let err = CollectionGroupMembershipsPayload
            .build(&store, &event)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DeliveryError::MissingReference { field: "model_id", .. }
        ));
    }

    #[tokio::test]
    async fn test_revision_payload() {
        let store = MemoryStore::new();
        let revision = Revision {
            id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Draft 2".to_string(),
            text: "Second pass".to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        store.insert_revision(revision.clone());

        let event = Event::new("revisions.create")
            .with_model(revision.id)
            .with_document(revision.document_id);
        let payload = RevisionsPayload.build(&store, &event).await.unwrap();

        assert_eq!(payload.id, revision.id.to_string());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["title"], "Draft 2");
        assert_eq!(json["model"]["documentId"], revision.document_id.to_string());
    }

    #[tokio::test]
    async fn test_file_operation_payload() {
        let store = MemoryStore::new();
        let now = OffsetDateTime::now_utc();
        let op = FileOperation {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            collection_id: None,
            kind: "export".to_string(),
            format: "outline-markdown".to_string(),
            state: "complete".to_string(),
            error: None,
            size: 2048,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        store.insert_file_operation(op.clone());

        let event = Event::new("fileOperations.update").with_model(op.id);
        let payload = FileOperationsPayload.build(&store, &event).await.unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["type"], "export");
        assert_eq!(json["model"]["state"], "complete");
        assert_eq!(json["model"]["size"], 2048);
    }

    #[tokio::test]
    async fn test_integration_payload() {
        let store = MemoryStore::new();
        let now = OffsetDateTime::now_utc();
        let integration = Integration {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            collection_id: None,
            kind: "post".to_string(),
            service: "slack".to_string(),
            events: vec!["documents.publish".to_string()],
            settings: serde_json::json!({ "channel": "#general" }),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        store.insert_integration(integration.clone());

        let event = Event::new("integrations.create").with_model(integration.id);
        let payload = IntegrationsPayload.build(&store, &event).await.unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["service"], "slack");
        assert_eq!(json["model"]["settings"]["channel"], "#general");
        assert_eq!(json["model"]["events"][0], "documents.publish");
    }

    #[tokio::test]
    async fn test_pin_payload() {
        let store = MemoryStore::new();
        let now = OffsetDateTime::now_utc();
        let pin = Pin {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            collection_id: Some(Uuid::new_v4()),
            created_by_id: Uuid::new_v4(),
            index: Some("a0".to_string()),
            created_at: now,
            updated_at: now,
        };
        store.insert_pin(pin.clone());

        let event = Event::new("pins.create").with_model(pin.id);
        let payload = PinsPayload.build(&store, &event).await.unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["documentId"], pin.document_id.to_string());
        assert_eq!(json["model"]["index"], "a0");
    }

    #[tokio::test]
    async fn test_star_payload() {
        let store = MemoryStore::new();
        let now = OffsetDateTime::now_utc();
        let star = Star {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            document_id: Some(Uuid::new_v4()),
            collection_id: None,
            index: Some("b1".to_string()),
            created_at: now,
            updated_at: now,
        };
        store.insert_star(star.clone());

        let event = Event::new("stars.update").with_model(star.id);
        let payload = StarsPayload.build(&store, &event).await.unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["index"], "b1");
        assert!(json["model"]["collectionId"].is_null());
    }

    #[tokio::test]
    async fn test_revoked_share_keeps_snapshot() {
        let store = MemoryStore::new();
        let now = OffsetDateTime::now_utc();
        let share = Share {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            url_id: Some("shared-doc".to_string()),
            published: true,
            include_child_documents: false,
            views: 12,
            last_accessed_at: Some(now),
            revoked_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        store.insert_share(share.clone());

        let event = Event::new("shares.revoke").with_model(share.id);
        let payload = SharesPayload.build(&store, &event).await.unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["urlId"], "shared-doc");
        assert_eq!(json["model"]["views"], 12);
    }

    #[tokio::test]
    async fn test_deleted_webhook_subscription_keeps_snapshot() {
        let store = MemoryStore::new();
        let mut sub = fixtures::subscription("https://hooks.example.test/in");
        sub.deleted_at = Some(OffsetDateTime::now_utc());
        store.insert_subscription(sub.clone());

        // Deliveries no longer see it, but its own delete event still does.
        assert!(store.find_subscription(sub.id).await.unwrap().is_none());

        let event = Event::new("webhook_subscriptions.delete").with_model(sub.id);
        let payload = WebhookSubscriptionsPayload
            .build(&store, &event)
            .await
            .unwrap();

        assert_eq!(payload.id, sub.id.to_string());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"]["url"], "https://hooks.example.test/in");
        assert_eq!(json["model"]["name"], "Test hook");
    }
}
