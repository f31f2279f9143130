use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::TeamModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub subdomain: Option<String>,
    pub domain: Option<String>,
    pub sharing: bool,
    pub member_collection_create: bool,
    pub invite_required: bool,
    pub default_user_role: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

/// A team together with its sign-in domain restrictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamWithDomains {
    pub team: Team,
    pub allowed_domains: Vec<String>,
}

impl From<&TeamWithDomains> for TeamModel {
    fn from(value: &TeamWithDomains) -> Self {
        let team = &value.team;
        TeamModel {
            id: team.id,
            name: team.name.clone(),
            avatar_url: team.avatar_url.clone(),
            subdomain: team.subdomain.clone(),
            domain: team.domain.clone(),
            sharing: team.sharing,
            member_collection_create: team.member_collection_create,
            invite_required: team.invite_required,
            default_user_role: team.default_user_role.clone(),
            allowed_domains: value.allowed_domains.clone(),
            updated_at: team.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
/// Get a team by id, including soft-deleted teams.
pub struct GetTeamById {
    pub team_id: Uuid,
}

impl Processor<GetTeamById> for DatabaseProcessor {
    type Output = Option<Team>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetTeamById")]
    async fn process(&self, query: GetTeamById) -> Result<Option<Team>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, avatar_url, subdomain, domain, sharing,
                   member_collection_create, invite_required, default_user_role,
                   created_at, updated_at, deleted_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(query.team_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// List the allowed sign-in domains of a team, oldest first.
pub struct ListTeamDomains {
    pub team_id: Uuid,
}

impl Processor<ListTeamDomains> for DatabaseProcessor {
    type Output = Vec<String>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListTeamDomains")]
    async fn process(&self, query: ListTeamDomains) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT name
            FROM team_domains
            WHERE team_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(query.team_id)
        .fetch_all(&self.pool)
        .await
    }
}
