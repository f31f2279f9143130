//! Maps event names onto payload builder families.
//!
//! [`classify_kind`] is a total match over [`EventName`] with no wildcard
//! arm, so adding an event to the taxonomy fails to compile until it is
//! routed here.

use hookrelay_sdk::objects::{EventName, UnknownEventName};
use std::fmt;
use tracing::warn;

/// A group of events sharing one payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerFamily {
    Users,
    Documents,
    Revisions,
    FileOperations,
    Collections,
    CollectionMemberships,
    CollectionGroupMemberships,
    Groups,
    GroupMemberships,
    Integrations,
    Teams,
    Pins,
    Stars,
    Shares,
    WebhookSubscriptions,
    Views,
}

impl fmt::Display for HandlerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandlerFamily::Users => "users",
            HandlerFamily::Documents => "documents",
            HandlerFamily::Revisions => "revisions",
            HandlerFamily::FileOperations => "file_operations",
            HandlerFamily::Collections => "collections",
            HandlerFamily::CollectionMemberships => "collection_memberships",
            HandlerFamily::CollectionGroupMemberships => "collection_group_memberships",
            HandlerFamily::Groups => "groups",
            HandlerFamily::GroupMemberships => "group_memberships",
            HandlerFamily::Integrations => "integrations",
            HandlerFamily::Teams => "teams",
            HandlerFamily::Pins => "pins",
            HandlerFamily::Stars => "stars",
            HandlerFamily::Shares => "shares",
            HandlerFamily::WebhookSubscriptions => "webhook_subscriptions",
            HandlerFamily::Views => "views",
        };
        f.write_str(name)
    }
}

/// Why an event produces no webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// API key events are internal and never leave the system.
    ApiKeys,
    /// Delayed and debounced document updates duplicate `documents.update`.
    DelayedVariant,
    /// The name is not in the taxonomy.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Handler(HandlerFamily),
    Ignored(IgnoreReason),
}

/// Classify a wire event name.
///
/// Unknown names are a gap between the producer and this table: they are
/// logged and ignored rather than failing the task.
pub fn classify(name: &str) -> Classification {
    match name.parse::<EventName>() {
        Ok(kind) => classify_kind(kind),
        Err(UnknownEventName(name)) => {
            warn!(event = %name, "No webhook handler for event, ignoring");
            Classification::Ignored(IgnoreReason::Unknown)
        }
    }
}

/// Classify a known event.
pub fn classify_kind(kind: EventName) -> Classification {
    use Classification::{Handler, Ignored};
    use HandlerFamily as F;

    match kind {
        EventName::ApiKeysCreate | EventName::ApiKeysDelete => Ignored(IgnoreReason::ApiKeys),

        EventName::UsersCreate
        | EventName::UsersSignin
        | EventName::UsersSignout
        | EventName::UsersUpdate
        | EventName::UsersSuspend
        | EventName::UsersActivate
        | EventName::UsersDelete
        | EventName::UsersInvite => Handler(F::Users),

        EventName::DocumentsCreate
        | EventName::DocumentsPublish
        | EventName::DocumentsUnpublish
        | EventName::DocumentsDelete
        | EventName::DocumentsPermanentDelete
        | EventName::DocumentsArchive
        | EventName::DocumentsUnarchive
        | EventName::DocumentsRestore
        | EventName::DocumentsStar
        | EventName::DocumentsUnstar
        | EventName::DocumentsMove
        | EventName::DocumentsUpdate
        | EventName::DocumentsTitleChange => Handler(F::Documents),

        EventName::DocumentsUpdateDelayed | EventName::DocumentsUpdateDebounced => {
            Ignored(IgnoreReason::DelayedVariant)
        }

        EventName::RevisionsCreate => Handler(F::Revisions),

        EventName::FileOperationsCreate
        | EventName::FileOperationsUpdate
        | EventName::FileOperationDelete => Handler(F::FileOperations),

        EventName::CollectionsCreate
        | EventName::CollectionsUpdate
        | EventName::CollectionsDelete
        | EventName::CollectionsMove
        | EventName::CollectionsPermissionChanged => Handler(F::Collections),

        EventName::CollectionsAddUser | EventName::CollectionsRemoveUser => {
            Handler(F::CollectionMemberships)
        }

        EventName::CollectionsAddGroup | EventName::CollectionsRemoveGroup => {
            Handler(F::CollectionGroupMemberships)
        }

        EventName::GroupsCreate | EventName::GroupsUpdate | EventName::GroupsDelete => {
            Handler(F::Groups)
        }

        EventName::GroupsAddUser | EventName::GroupsRemoveUser => Handler(F::GroupMemberships),

        EventName::IntegrationsCreate | EventName::IntegrationsUpdate => {
            Handler(F::Integrations)
        }

        EventName::TeamsUpdate => Handler(F::Teams),

        EventName::PinsCreate | EventName::PinsUpdate | EventName::PinsDelete => Handler(F::Pins),

        EventName::StarsCreate | EventName::StarsUpdate | EventName::StarsDelete => {
            Handler(F::Stars)
        }

        EventName::SharesCreate | EventName::SharesUpdate | EventName::SharesRevoke => {
            Handler(F::Shares)
        }

        EventName::WebhookSubscriptionsCreate
        | EventName::WebhookSubscriptionsUpdate
        | EventName::WebhookSubscriptionsDelete => Handler(F::WebhookSubscriptions),

        EventName::ViewsCreate => Handler(F::Views),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_event_is_routed() {
        for kind in EventName::ALL {
            let classification = classify(kind.as_str());
            assert_ne!(
                classification,
                Classification::Ignored(IgnoreReason::Unknown),
                "{kind} fell through to unknown"
            );
        }
    }

    #[test]
    fn test_representative_routes() {
        let cases = [
            ("documents.publish", Classification::Handler(HandlerFamily::Documents)),
            ("users.signin", Classification::Handler(HandlerFamily::Users)),
            ("collections.add_user", Classification::Handler(HandlerFamily::CollectionMemberships)),
            (
                "collections.remove_group",
                Classification::Handler(HandlerFamily::CollectionGroupMemberships),
            ),
            ("groups.add_user", Classification::Handler(HandlerFamily::GroupMemberships)),
            ("fileOperation.delete", Classification::Handler(HandlerFamily::FileOperations)),
            ("teams.update", Classification::Handler(HandlerFamily::Teams)),
            ("views.create", Classification::Handler(HandlerFamily::Views)),
            ("api_keys.create", Classification::Ignored(IgnoreReason::ApiKeys)),
            ("documents.update.debounced", Classification::Ignored(IgnoreReason::DelayedVariant)),
        ];
        for (name, expected) in cases {
            assert_eq!(classify(name), expected, "{name}");
        }
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        assert_eq!(
            classify("documents.teleport"),
            Classification::Ignored(IgnoreReason::Unknown)
        );
        // The plural namespace is not what the producer emits for deletes.
        assert_eq!(
            classify("fileOperations.delete"),
            Classification::Ignored(IgnoreReason::Unknown)
        );
        assert_eq!(classify(""), Classification::Ignored(IgnoreReason::Unknown));
    }
}
