use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::UserModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub suspended_at: Option<OffsetDateTime>,
    pub last_active_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl From<&User> for UserModel {
    fn from(user: &User) -> Self {
        UserModel {
            id: user.id,
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            is_suspended: user.suspended_at.is_some(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_active_at: user.last_active_at,
        }
    }
}

#[derive(Debug, Clone)]
/// Get a user by id, including soft-deleted users.
pub struct GetUserById {
    pub user_id: Uuid,
}

impl Processor<GetUserById> for DatabaseProcessor {
    type Output = Option<User>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserById")]
    async fn process(&self, query: GetUserById) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, team_id, name, email, avatar_url, role, suspended_at,
                   last_active_at, created_at, updated_at, deleted_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(query.user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
