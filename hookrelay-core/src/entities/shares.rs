use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::ShareModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Share {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub document_id: Uuid,
    pub url_id: Option<String>,
    pub published: bool,
    pub include_child_documents: bool,
    pub views: i64,
    pub last_accessed_at: Option<OffsetDateTime>,
    /// Set when the share link was revoked; the row is kept.
    pub revoked_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<&Share> for ShareModel {
    fn from(share: &Share) -> Self {
        ShareModel {
            id: share.id,
            document_id: share.document_id,
            url_id: share.url_id.clone(),
            published: share.published,
            include_child_documents: share.include_child_documents,
            created_by_id: share.user_id,
            views: share.views,
            last_accessed_at: share.last_accessed_at,
            created_at: share.created_at,
            updated_at: share.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
/// Get a share by id, revoked shares included.
pub struct GetShareById {
    pub share_id: Uuid,
}

impl Processor<GetShareById> for DatabaseProcessor {
    type Output = Option<Share>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetShareById")]
    async fn process(&self, query: GetShareById) -> Result<Option<Share>, sqlx::Error> {
        sqlx::query_as::<_, Share>(
            r#"
            SELECT id, team_id, user_id, document_id, url_id, published,
                   include_child_documents, views, last_accessed_at, revoked_at,
                   created_at, updated_at
            FROM shares
            WHERE id = $1
            "#,
        )
        .bind(query.share_id)
        .fetch_optional(&self.pool)
        .await
    }
}
