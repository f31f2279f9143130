use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::DeliveryStatus as SdkDeliveryStatus;
use hookrelay_sdk::objects::admin::AdminDeliveryResponse;
use kanau::processor::Processor;
use sqlx::types::Json;
use std::collections::BTreeMap;
use time::OffsetDateTime;
use uuid::Uuid;

/// Header name to value, as captured on the wire.
pub type Headers = BTreeMap<String, String>;

/// One delivery attempt in the ledger.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct WebhookDelivery {
    pub id: Uuid,
    pub webhook_subscription_id: Uuid,
    pub status: WebhookDeliveryStatus,
    pub status_code: Option<i32>,
    pub request_body: Option<Json<serde_json::Value>>,
    pub request_headers: Option<Json<Headers>>,
    pub response_body: Option<String>,
    pub response_headers: Option<Json<Headers>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Delivery status for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `hookrelay_sdk::objects::DeliveryStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "webhook_delivery_status")]
pub enum WebhookDeliveryStatus {
    Pending,
    Success,
    Failed,
}

impl From<WebhookDeliveryStatus> for SdkDeliveryStatus {
    fn from(value: WebhookDeliveryStatus) -> Self {
        match value {
            WebhookDeliveryStatus::Pending => SdkDeliveryStatus::Pending,
            WebhookDeliveryStatus::Success => SdkDeliveryStatus::Success,
            WebhookDeliveryStatus::Failed => SdkDeliveryStatus::Failed,
        }
    }
}

impl From<&WebhookDelivery> for AdminDeliveryResponse {
    fn from(d: &WebhookDelivery) -> Self {
        AdminDeliveryResponse {
            id: d.id,
            webhook_subscription_id: d.webhook_subscription_id,
            status: d.status.into(),
            status_code: d.status_code,
            request_body: d.request_body.as_ref().map(|b| b.0.clone()),
            request_headers: d.request_headers.as_ref().map(|h| h.0.clone()),
            response_body: d.response_body.clone(),
            response_headers: d.response_headers.as_ref().map(|h| h.0.clone()),
            created_at: d.created_at.unix_timestamp(),
            updated_at: d.updated_at.unix_timestamp(),
        }
    }
}

const DELIVERY_COLUMNS: &str = "id, webhook_subscription_id, status, status_code, request_body, \
    request_headers, response_body, response_headers, created_at, updated_at";

#[derive(Debug, Clone)]
/// Insert a new `pending` delivery for a subscription.
pub struct CreateWebhookDelivery {
    pub subscription_id: Uuid,
}

impl Processor<CreateWebhookDelivery> for DatabaseProcessor {
    type Output = WebhookDelivery;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateWebhookDelivery")]
    async fn process(&self, insert: CreateWebhookDelivery) -> Result<WebhookDelivery, sqlx::Error> {
        let sql = format!(
            "INSERT INTO webhook_deliveries (id, webhook_subscription_id, status) \
             VALUES ($1, $2, 'pending') \
             RETURNING {DELIVERY_COLUMNS}"
        );
        sqlx::query_as::<_, WebhookDelivery>(&sql)
            .bind(Uuid::now_v7())
            .bind(insert.subscription_id)
            .fetch_one(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
/// Record the outcome of an attempt on its ledger row.
pub struct FinalizeWebhookDelivery {
    pub delivery_id: Uuid,
    pub status: WebhookDeliveryStatus,
    pub status_code: Option<i32>,
    pub request_body: Option<serde_json::Value>,
    pub request_headers: Headers,
    pub response_body: String,
    pub response_headers: Headers,
}

impl Processor<FinalizeWebhookDelivery> for DatabaseProcessor {
    type Output = WebhookDelivery;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:FinalizeWebhookDelivery")]
    async fn process(
        &self,
        update: FinalizeWebhookDelivery,
    ) -> Result<WebhookDelivery, sqlx::Error> {
        let sql = format!(
            "UPDATE webhook_deliveries \
             SET status = $2, status_code = $3, request_body = $4, request_headers = $5, \
                 response_body = $6, response_headers = $7, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {DELIVERY_COLUMNS}"
        );
        sqlx::query_as::<_, WebhookDelivery>(&sql)
            .bind(update.delivery_id)
            .bind(update.status)
            .bind(update.status_code)
            .bind(update.request_body.map(Json))
            .bind(Json(update.request_headers))
            .bind(update.response_body)
            .bind(Json(update.response_headers))
            .fetch_one(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
/// List deliveries of a subscription, newest first.
pub struct ListWebhookDeliveries {
    pub subscription_id: Uuid,
    pub limit: i64,
    pub offset: i64,
}

impl Processor<ListWebhookDeliveries> for DatabaseProcessor {
    type Output = Vec<WebhookDelivery>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListWebhookDeliveries")]
    async fn process(
        &self,
        query: ListWebhookDeliveries,
    ) -> Result<Vec<WebhookDelivery>, sqlx::Error> {
        let sql = format!(
            "SELECT {DELIVERY_COLUMNS} \
             FROM webhook_deliveries \
             WHERE webhook_subscription_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, WebhookDelivery>(&sql)
            .bind(query.subscription_id)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
    }
}
