use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::DocumentModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub url_id: String,
    pub team_id: Uuid,
    pub collection_id: Option<Uuid>,
    pub parent_document_id: Option<Uuid>,
    pub title: String,
    pub text: String,
    pub emoji: Option<String>,
    pub created_by_id: Uuid,
    pub updated_by_id: Uuid,
    pub template: bool,
    pub full_width: bool,
    pub revision_count: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub published_at: Option<OffsetDateTime>,
    pub archived_at: Option<OffsetDateTime>,
    pub deleted_at: Option<OffsetDateTime>,
}

impl From<&Document> for DocumentModel {
    fn from(doc: &Document) -> Self {
        DocumentModel {
            id: doc.id,
            url_id: doc.url_id.clone(),
            title: doc.title.clone(),
            text: doc.text.clone(),
            emoji: doc.emoji.clone(),
            collection_id: doc.collection_id,
            parent_document_id: doc.parent_document_id,
            created_by_id: doc.created_by_id,
            updated_by_id: doc.updated_by_id,
            template: doc.template,
            full_width: doc.full_width,
            revision_count: doc.revision_count,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            published_at: doc.published_at,
            archived_at: doc.archived_at,
            deleted_at: doc.deleted_at,
        }
    }
}

#[derive(Debug, Clone)]
/// Get a document by id.
///
/// Deleted and archived documents are returned as well so that their final
/// state can still be reported.
pub struct GetDocumentById {
    pub document_id: Uuid,
}

impl Processor<GetDocumentById> for DatabaseProcessor {
    type Output = Option<Document>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetDocumentById")]
    async fn process(&self, query: GetDocumentById) -> Result<Option<Document>, sqlx::Error> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT id, url_id, team_id, collection_id, parent_document_id, title, text,
                   emoji, created_by_id, updated_by_id, template, full_width,
                   revision_count, created_at, updated_at, published_at, archived_at,
                   deleted_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(query.document_id)
        .fetch_optional(&self.pool)
        .await
    }
}
