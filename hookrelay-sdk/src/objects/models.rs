//! Normalized model snapshots carried in webhook payloads.
//!
//! These are the API/DTO versions of the domain rows. For database
//! operations, see the entities in `hookrelay-core`.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserModel {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub role: String,
    pub is_suspended: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_active_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    pub id: Uuid,
    pub url_id: String,
    pub title: String,
    pub text: String,
    pub emoji: Option<String>,
    pub collection_id: Option<Uuid>,
    pub parent_document_id: Option<Uuid>,
    pub created_by_id: Uuid,
    pub updated_by_id: Uuid,
    pub template: bool,
    pub full_width: bool,
    pub revision_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub archived_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub title: String,
    pub text: String,
    pub created_by_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOperationModel {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub format: String,
    pub state: String,
    pub error: Option<String>,
    pub size: i64,
    pub collection_id: Option<Uuid>,
    pub created_by_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionModel {
    pub id: Uuid,
    pub url_id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub permission: Option<String>,
    pub sharing: bool,
    pub index: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub archived_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

/// A user's membership in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipModel {
    /// `"<userId>-<collectionId>"`
    pub id: String,
    pub user_id: Uuid,
    pub collection_id: Uuid,
    pub permission: String,
}

/// A group's membership in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionGroupMembershipModel {
    /// `"<groupId>-<collectionId>"`
    pub id: String,
    pub group_id: Uuid,
    pub collection_id: Uuid,
    pub permission: String,
}

/// A user's membership in a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembershipModel {
    /// `"<userId>-<groupId>"`
    pub id: String,
    pub user_id: Uuid,
    pub group_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupModel {
    pub id: Uuid,
    pub name: String,
    pub member_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationModel {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub service: String,
    pub collection_id: Option<Uuid>,
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub events: Vec<String>,
    pub settings: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub collection_id: Option<Uuid>,
    pub index: Option<String>,
    pub created_by_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarModel {
    pub id: Uuid,
    pub document_id: Option<Uuid>,
    pub collection_id: Option<Uuid>,
    pub index: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub url_id: Option<String>,
    pub published: bool,
    pub include_child_documents: bool,
    pub created_by_id: Uuid,
    pub views: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_accessed_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub first_viewed_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_viewed_at: OffsetDateTime,
    pub user: Option<UserModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamModel {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub subdomain: Option<String>,
    pub domain: Option<String>,
    pub sharing: bool,
    pub member_collection_create: bool,
    pub invite_required: bool,
    pub default_user_role: String,
    pub allowed_domains: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscriptionModel {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub enabled: bool,
    pub events: Vec<String>,
    pub created_by_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
