use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::WebhookSubscriptionModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

/// A registered external endpoint.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct WebhookSubscription {
    pub id: Uuid,
    pub team_id: Uuid,
    pub created_by_id: Uuid,
    pub name: String,
    pub url: String,
    /// Only ever flipped to `false` by the delivery pipeline.
    pub enabled: bool,
    pub events: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

impl From<&WebhookSubscription> for WebhookSubscriptionModel {
    fn from(sub: &WebhookSubscription) -> Self {
        WebhookSubscriptionModel {
            id: sub.id,
            name: sub.name.clone(),
            url: sub.url.clone(),
            enabled: sub.enabled,
            events: sub.events.clone(),
            created_by_id: sub.created_by_id,
            created_at: sub.created_at,
            updated_at: sub.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
/// Get a subscription by id.
///
/// With `include_deleted = false` a soft-deleted subscription is treated as
/// missing, which is what the delivery task wants. Payloads about
/// subscriptions themselves pass `true`.
pub struct GetWebhookSubscriptionById {
    pub subscription_id: Uuid,
    pub include_deleted: bool,
}

impl Processor<GetWebhookSubscriptionById> for DatabaseProcessor {
    type Output = Option<WebhookSubscription>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetWebhookSubscriptionById")]
    async fn process(
        &self,
        query: GetWebhookSubscriptionById,
    ) -> Result<Option<WebhookSubscription>, sqlx::Error> {
        sqlx::query_as::<_, WebhookSubscription>(
            r#"
            SELECT id, team_id, created_by_id, name, url, enabled, events,
                   created_at, updated_at, deleted_at
            FROM webhook_subscriptions
            WHERE id = $1 AND ($2 OR deleted_at IS NULL)
            "#,
        )
        .bind(query.subscription_id)
        .bind(query.include_deleted)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Set `enabled = false` on a subscription.
///
/// Idempotent: disabling an already disabled subscription is a no-op apart
/// from `updated_at`. Returns the number of affected rows.
pub struct DisableWebhookSubscription {
    pub subscription_id: Uuid,
}

impl Processor<DisableWebhookSubscription> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DisableWebhookSubscription")]
    async fn process(&self, query: DisableWebhookSubscription) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE webhook_subscriptions
            SET enabled = FALSE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(query.subscription_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
