use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::FileOperationModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

/// An import or export job.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FileOperation {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub collection_id: Option<Uuid>,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub format: String,
    pub state: String,
    pub error: Option<String>,
    pub size: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl From<&FileOperation> for FileOperationModel {
    fn from(op: &FileOperation) -> Self {
        FileOperationModel {
            id: op.id,
            kind: op.kind.clone(),
            format: op.format.clone(),
            state: op.state.clone(),
            error: op.error.clone(),
            size: op.size,
            collection_id: op.collection_id,
            created_by_id: op.user_id,
            created_at: op.created_at,
            updated_at: op.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetFileOperationById {
    pub file_operation_id: Uuid,
}

impl Processor<GetFileOperationById> for DatabaseProcessor {
    type Output = Option<FileOperation>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetFileOperationById")]
    async fn process(
        &self,
        query: GetFileOperationById,
    ) -> Result<Option<FileOperation>, sqlx::Error> {
        sqlx::query_as::<_, FileOperation>(
            r#"
            SELECT id, team_id, user_id, collection_id, type, format, state, error,
                   size, created_at, updated_at, deleted_at
            FROM file_operations
            WHERE id = $1
            "#,
        )
        .bind(query.file_operation_id)
        .fetch_optional(&self.pool)
        .await
    }
}
