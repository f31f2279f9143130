//! Relation rows: user-in-collection, group-in-collection and user-in-group.
//!
//! Each relation is addressed by its two keys and has no id of its own. The
//! snapshot id is the composite `"<childId>-<parentId>"`.

use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::{
    CollectionGroupMembershipModel, GroupMembershipModel, MembershipModel,
};
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

/// Format a relation id as `"<childId>-<parentId>"`.
pub fn composite_id(child: Uuid, parent: Uuid) -> String {
    format!("{child}-{parent}")
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CollectionUser {
    pub collection_id: Uuid,
    pub user_id: Uuid,
    pub permission: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<&CollectionUser> for MembershipModel {
    fn from(m: &CollectionUser) -> Self {
        MembershipModel {
            id: composite_id(m.user_id, m.collection_id),
            user_id: m.user_id,
            collection_id: m.collection_id,
            permission: m.permission.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CollectionGroup {
    pub collection_id: Uuid,
    pub group_id: Uuid,
    pub permission: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl From<&CollectionGroup> for CollectionGroupMembershipModel {
    fn from(m: &CollectionGroup) -> Self {
        CollectionGroupMembershipModel {
            id: composite_id(m.group_id, m.collection_id),
            group_id: m.group_id,
            collection_id: m.collection_id,
            permission: m.permission.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct GroupUser {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl From<&GroupUser> for GroupMembershipModel {
    fn from(m: &GroupUser) -> Self {
        GroupMembershipModel {
            id: composite_id(m.user_id, m.group_id),
            user_id: m.user_id,
            group_id: m.group_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetCollectionUser {
    pub collection_id: Uuid,
    pub user_id: Uuid,
}

impl Processor<GetCollectionUser> for DatabaseProcessor {
    type Output = Option<CollectionUser>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCollectionUser")]
    async fn process(
        &self,
        query: GetCollectionUser,
    ) -> Result<Option<CollectionUser>, sqlx::Error> {
        sqlx::query_as::<_, CollectionUser>(
            r#"
            SELECT collection_id, user_id, permission, created_at, updated_at
            FROM collection_users
            WHERE collection_id = $1 AND user_id = $2
            "#,
        )
        .bind(query.collection_id)
        .bind(query.user_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetCollectionGroup {
    pub collection_id: Uuid,
    pub group_id: Uuid,
}

impl Processor<GetCollectionGroup> for DatabaseProcessor {
    type Output = Option<CollectionGroup>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCollectionGroup")]
    async fn process(
        &self,
        query: GetCollectionGroup,
    ) -> Result<Option<CollectionGroup>, sqlx::Error> {
        sqlx::query_as::<_, CollectionGroup>(
            r#"
            SELECT collection_id, group_id, permission, created_at, updated_at, deleted_at
            FROM collection_groups
            WHERE collection_id = $1 AND group_id = $2
            "#,
        )
        .bind(query.collection_id)
        .bind(query.group_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
pub struct GetGroupUser {
    pub group_id: Uuid,
    pub user_id: Uuid,
}

impl Processor<GetGroupUser> for DatabaseProcessor {
    type Output = Option<GroupUser>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetGroupUser")]
    async fn process(&self, query: GetGroupUser) -> Result<Option<GroupUser>, sqlx::Error> {
        sqlx::query_as::<_, GroupUser>(
            r#"
            SELECT group_id, user_id, created_at, updated_at, deleted_at
            FROM group_users
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(query.group_id)
        .bind(query.user_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_id_puts_child_first() {
        let user = Uuid::from_u128(1);
        let group = Uuid::from_u128(2);
        assert_eq!(
            composite_id(user, group),
            "00000000-0000-0000-0000-000000000001-00000000-0000-0000-0000-000000000002"
        );
    }
}
