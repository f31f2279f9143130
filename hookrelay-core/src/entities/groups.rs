use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::GroupModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    /// Active (not removed) members at query time.
    pub member_count: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl From<&Group> for GroupModel {
    fn from(group: &Group) -> Self {
        GroupModel {
            id: group.id,
            name: group.name.clone(),
            member_count: group.member_count,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
/// Get a group by id, including soft-deleted groups.
pub struct GetGroupById {
    pub group_id: Uuid,
}

impl Processor<GetGroupById> for DatabaseProcessor {
    type Output = Option<Group>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetGroupById")]
    async fn process(&self, query: GetGroupById) -> Result<Option<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            r#"
            SELECT
                g.id,
                g.team_id,
                g.name,
                (
                    SELECT COUNT(*)
                    FROM group_users gu
                    WHERE gu.group_id = g.id AND gu.deleted_at IS NULL
                ) AS member_count,
                g.created_at,
                g.updated_at,
                g.deleted_at
            FROM groups g
            WHERE g.id = $1
            "#,
        )
        .bind(query.group_id)
        .fetch_optional(&self.pool)
        .await
    }
}
