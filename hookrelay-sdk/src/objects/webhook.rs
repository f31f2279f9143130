//! Webhook envelope and payload types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use uuid::Uuid;

use super::models::{
    CollectionGroupMembershipModel, CollectionModel, DocumentModel, FileOperationModel,
    GroupMembershipModel, GroupModel, IntegrationModel, MembershipModel, PinModel,
    RevisionModel, ShareModel, StarModel, TeamModel, UserModel, ViewModel,
    WebhookSubscriptionModel,
};

/// Any snapshot that may appear as `model` (or as a related entity) in a payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PayloadModel {
    User(UserModel),
    Document(DocumentModel),
    Revision(RevisionModel),
    FileOperation(FileOperationModel),
    Collection(CollectionModel),
    Membership(MembershipModel),
    CollectionGroupMembership(CollectionGroupMembershipModel),
    GroupMembership(GroupMembershipModel),
    Group(GroupModel),
    Integration(IntegrationModel),
    Pin(PinModel),
    Star(StarModel),
    Share(ShareModel),
    View(ViewModel),
    Team(TeamModel),
    WebhookSubscription(WebhookSubscriptionModel),
}

macro_rules! payload_model_from {
    ($($model:ty => $variant:ident,)+) => {
        $(
            impl From<$model> for PayloadModel {
                fn from(value: $model) -> Self {
                    PayloadModel::$variant(value)
                }
            }
        )+
    };
}

payload_model_from! {
    UserModel => User,
    DocumentModel => Document,
    RevisionModel => Revision,
    FileOperationModel => FileOperation,
    CollectionModel => Collection,
    MembershipModel => Membership,
    CollectionGroupMembershipModel => CollectionGroupMembership,
    GroupMembershipModel => GroupMembership,
    GroupModel => Group,
    IntegrationModel => Integration,
    PinModel => Pin,
    StarModel => Star,
    ShareModel => Share,
    ViewModel => View,
    TeamModel => Team,
    WebhookSubscriptionModel => WebhookSubscription,
}

/// The `payload` object of a webhook.
///
/// `model` is `None` when the referenced entity no longer exists. Relationship
/// payloads list their related snapshots in `related`, which is flattened into
/// the payload object, so a missing relation serializes as `"user": null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub id: String,
    pub model: Option<PayloadModel>,
    #[serde(flatten)]
    pub related: BTreeMap<&'static str, Option<PayloadModel>>,
}

impl WebhookPayload {
    pub fn new(id: impl Into<String>, model: Option<PayloadModel>) -> Self {
        Self {
            id: id.into(),
            model,
            related: BTreeMap::new(),
        }
    }

    /// Attach a related snapshot under `key`.
    pub fn with_related(mut self, key: &'static str, model: Option<PayloadModel>) -> Self {
        self.related.insert(key, model);
        self
    }
}

/// The JSON body POSTed to a subscription URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope {
    /// The delivery id.
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub webhook_subscription_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub event: String,
    pub payload: WebhookPayload,
}

/// Delivery status for API responses.
///
/// This is the API/DTO version without sqlx::Type.
/// For database operations, use the version in `hookrelay-core::entities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Success,
    Failed,
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::Pending => write!(f, "pending"),
            DeliveryStatus::Success => write!(f, "success"),
            DeliveryStatus::Failed => write!(f, "failed"),
        }
    }
}
