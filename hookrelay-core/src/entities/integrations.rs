use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::IntegrationModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Integration {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub collection_id: Option<Uuid>,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub service: String,
    pub events: Vec<String>,
    pub settings: serde_json::Value,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl From<&Integration> for IntegrationModel {
    fn from(integration: &Integration) -> Self {
        IntegrationModel {
            id: integration.id,
            kind: integration.kind.clone(),
            service: integration.service.clone(),
            collection_id: integration.collection_id,
            user_id: integration.user_id,
            team_id: integration.team_id,
            events: integration.events.clone(),
            settings: integration.settings.clone(),
            created_at: integration.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetIntegrationById {
    pub integration_id: Uuid,
}

impl Processor<GetIntegrationById> for DatabaseProcessor {
    type Output = Option<Integration>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetIntegrationById")]
    async fn process(
        &self,
        query: GetIntegrationById,
    ) -> Result<Option<Integration>, sqlx::Error> {
        sqlx::query_as::<_, Integration>(
            r#"
            SELECT id, team_id, user_id, collection_id, type, service, events, settings,
                   created_at, updated_at, deleted_at
            FROM integrations
            WHERE id = $1
            "#,
        )
        .bind(query.integration_id)
        .fetch_optional(&self.pool)
        .await
    }
}
