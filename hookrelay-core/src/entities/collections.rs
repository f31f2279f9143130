use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::CollectionModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Collection {
    pub id: Uuid,
    pub url_id: String,
    pub team_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub permission: Option<String>,
    pub sharing: bool,
    pub index: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub archived_at: Option<OffsetDateTime>,
    pub deleted_at: Option<OffsetDateTime>,
}

impl From<&Collection> for CollectionModel {
    fn from(collection: &Collection) -> Self {
        CollectionModel {
            id: collection.id,
            url_id: collection.url_id.clone(),
            name: collection.name.clone(),
            description: collection.description.clone(),
            color: collection.color.clone(),
            icon: collection.icon.clone(),
            permission: collection.permission.clone(),
            sharing: collection.sharing,
            index: collection.index.clone(),
            created_at: collection.created_at,
            updated_at: collection.updated_at,
            archived_at: collection.archived_at,
            deleted_at: collection.deleted_at,
        }
    }
}

#[derive(Debug, Clone)]
/// Get a collection by id, including soft-deleted collections.
pub struct GetCollectionById {
    pub collection_id: Uuid,
}

impl Processor<GetCollectionById> for DatabaseProcessor {
    type Output = Option<Collection>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetCollectionById")]
    async fn process(&self, query: GetCollectionById) -> Result<Option<Collection>, sqlx::Error> {
        sqlx::query_as::<_, Collection>(
            r#"
            SELECT id, url_id, team_id, name, description, color, icon, permission,
                   sharing, "index", created_at, updated_at, archived_at, deleted_at
            FROM collections
            WHERE id = $1
            "#,
        )
        .bind(query.collection_id)
        .fetch_optional(&self.pool)
        .await
    }
}
