use crate::entities::users::User;
use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::ViewModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

/// Per-user view counter of a document.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct View {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub count: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A view with the viewing user attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewWithUser {
    pub view: View,
    pub user: Option<User>,
}

impl From<&ViewWithUser> for ViewModel {
    fn from(value: &ViewWithUser) -> Self {
        let view = &value.view;
        ViewModel {
            id: view.id,
            document_id: view.document_id,
            count: view.count,
            first_viewed_at: view.created_at,
            last_viewed_at: view.updated_at,
            user: value.user.as_ref().map(Into::into),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetViewById {
    pub view_id: Uuid,
}

impl Processor<GetViewById> for DatabaseProcessor {
    type Output = Option<View>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetViewById")]
    async fn process(&self, query: GetViewById) -> Result<Option<View>, sqlx::Error> {
        sqlx::query_as::<_, View>(
            r#"
            SELECT id, document_id, user_id, count, created_at, updated_at
            FROM views
            WHERE id = $1
            "#,
        )
        .bind(query.view_id)
        .fetch_optional(&self.pool)
        .await
    }
}
