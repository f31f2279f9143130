use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::RevisionModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Revision {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub created_at: OffsetDateTime,
}

impl From<&Revision> for RevisionModel {
    fn from(revision: &Revision) -> Self {
        RevisionModel {
            id: revision.id,
            document_id: revision.document_id,
            title: revision.title.clone(),
            text: revision.text.clone(),
            created_by_id: revision.user_id,
            created_at: revision.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetRevisionById {
    pub revision_id: Uuid,
}

impl Processor<GetRevisionById> for DatabaseProcessor {
    type Output = Option<Revision>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetRevisionById")]
    async fn process(&self, query: GetRevisionById) -> Result<Option<Revision>, sqlx::Error> {
        sqlx::query_as::<_, Revision>(
            r#"
            SELECT id, document_id, user_id, title, text, created_at
            FROM revisions
            WHERE id = $1
            "#,
        )
        .bind(query.revision_id)
        .fetch_optional(&self.pool)
        .await
    }
}
