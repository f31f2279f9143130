//! Domain events as they arrive from the event bus.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

/// An immutable fact emitted by the domain layer.
///
/// The reference ids that are populated depend on the event family, e.g.
/// document events carry `document_id` while group membership events carry
/// `model_id` (the group) and `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Wire name, e.g. `documents.publish`.
    pub name: String,
    #[serde(default)]
    pub actor_id: Option<Uuid>,
    #[serde(default)]
    pub team_id: Option<Uuid>,
    #[serde(default)]
    pub document_id: Option<Uuid>,
    #[serde(default)]
    pub collection_id: Option<Uuid>,
    #[serde(default)]
    pub model_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default = "OffsetDateTime::now_utc", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Free-form extra data attached by the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Event {
    /// Create an event with no reference ids set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actor_id: None,
            team_id: None,
            document_id: None,
            collection_id: None,
            model_id: None,
            user_id: None,
            created_at: OffsetDateTime::now_utc(),
            data: None,
        }
    }

    pub fn with_actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn with_team(mut self, team_id: Uuid) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn with_document(mut self, document_id: Uuid) -> Self {
        self.document_id = Some(document_id);
        self
    }

    pub fn with_collection(mut self, collection_id: Uuid) -> Self {
        self.collection_id = Some(collection_id);
        self
    }

    pub fn with_model(mut self, model_id: Uuid) -> Self {
        self.model_id = Some(model_id);
        self
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Parse the wire name into the closed taxonomy.
    pub fn kind(&self) -> Result<EventName, UnknownEventName> {
        self.name.parse()
    }
}

/// The wire name was not part of the known taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event name: {0}")]
pub struct UnknownEventName(pub String);

macro_rules! event_names {
    ($($variant:ident => $wire:literal,)+) => {
        /// Every event name the domain layer can emit.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EventName {
            $($variant,)+
        }

        impl EventName {
            /// All known event names, in declaration order.
            pub const ALL: &'static [EventName] = &[$(EventName::$variant,)+];

            /// The wire representation of this event name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(EventName::$variant => $wire,)+
                }
            }
        }

        impl FromStr for EventName {
            type Err = UnknownEventName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(EventName::$variant),)+
                    other => Err(UnknownEventName(other.to_string())),
                }
            }
        }
    };
}

event_names! {
    ApiKeysCreate => "api_keys.create",
    ApiKeysDelete => "api_keys.delete",

    UsersCreate => "users.create",
    UsersSignin => "users.signin",
    UsersSignout => "users.signout",
    UsersUpdate => "users.update",
    UsersSuspend => "users.suspend",
    UsersActivate => "users.activate",
    UsersDelete => "users.delete",
    UsersInvite => "users.invite",

    DocumentsCreate => "documents.create",
    DocumentsPublish => "documents.publish",
    DocumentsUnpublish => "documents.unpublish",
    DocumentsDelete => "documents.delete",
    DocumentsPermanentDelete => "documents.permanent_delete",
    DocumentsArchive => "documents.archive",
    DocumentsUnarchive => "documents.unarchive",
    DocumentsRestore => "documents.restore",
    DocumentsStar => "documents.star",
    DocumentsUnstar => "documents.unstar",
    DocumentsMove => "documents.move",
    DocumentsUpdate => "documents.update",
    DocumentsTitleChange => "documents.title_change",
    DocumentsUpdateDelayed => "documents.update.delayed",
    DocumentsUpdateDebounced => "documents.update.debounced",

    RevisionsCreate => "revisions.create",

    FileOperationsCreate => "fileOperations.create",
    FileOperationsUpdate => "fileOperations.update",
    // The producer emits the singular namespace for deletes.
    FileOperationDelete => "fileOperation.delete",

    CollectionsCreate => "collections.create",
    CollectionsUpdate => "collections.update",
    CollectionsDelete => "collections.delete",
    CollectionsMove => "collections.move",
    CollectionsPermissionChanged => "collections.permission_changed",
    CollectionsAddUser => "collections.add_user",
    CollectionsRemoveUser => "collections.remove_user",
    CollectionsAddGroup => "collections.add_group",
    CollectionsRemoveGroup => "collections.remove_group",

    GroupsCreate => "groups.create",
    GroupsUpdate => "groups.update",
    GroupsDelete => "groups.delete",
    GroupsAddUser => "groups.add_user",
    GroupsRemoveUser => "groups.remove_user",

    IntegrationsCreate => "integrations.create",
    IntegrationsUpdate => "integrations.update",

    TeamsUpdate => "teams.update",

    PinsCreate => "pins.create",
    PinsUpdate => "pins.update",
    PinsDelete => "pins.delete",

    StarsCreate => "stars.create",
    StarsUpdate => "stars.update",
    StarsDelete => "stars.delete",

    SharesCreate => "shares.create",
    SharesUpdate => "shares.update",
    SharesRevoke => "shares.revoke",

    WebhookSubscriptionsCreate => "webhook_subscriptions.create",
    WebhookSubscriptionsUpdate => "webhook_subscriptions.update",
    WebhookSubscriptionsDelete => "webhook_subscriptions.delete",

    ViewsCreate => "views.create",
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
