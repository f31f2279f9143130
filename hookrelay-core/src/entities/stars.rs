use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::StarModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

/// A user's bookmark on a document or a collection.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Star {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_id: Option<Uuid>,
    pub collection_id: Option<Uuid>,
    pub index: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<&Star> for StarModel {
    fn from(star: &Star) -> Self {
        StarModel {
            id: star.id,
            document_id: star.document_id,
            collection_id: star.collection_id,
            index: star.index.clone(),
            created_at: star.created_at,
            updated_at: star.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetStarById {
    pub star_id: Uuid,
}

impl Processor<GetStarById> for DatabaseProcessor {
    type Output = Option<Star>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetStarById")]
    async fn process(&self, query: GetStarById) -> Result<Option<Star>, sqlx::Error> {
        sqlx::query_as::<_, Star>(
            r#"
            SELECT id, user_id, document_id, collection_id, "index", created_at, updated_at
            FROM stars
            WHERE id = $1
            "#,
        )
        .bind(query.star_id)
        .fetch_optional(&self.pool)
        .await
    }
}
