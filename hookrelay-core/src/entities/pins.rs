use crate::framework::DatabaseProcessor;
use hookrelay_sdk::objects::models::PinModel;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Pin {
    pub id: Uuid,
    pub team_id: Uuid,
    pub document_id: Uuid,
    pub collection_id: Option<Uuid>,
    pub created_by_id: Uuid,
    pub index: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<&Pin> for PinModel {
    fn from(pin: &Pin) -> Self {
        PinModel {
            id: pin.id,
            document_id: pin.document_id,
            collection_id: pin.collection_id,
            index: pin.index.clone(),
            created_by_id: pin.created_by_id,
            created_at: pin.created_at,
            updated_at: pin.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetPinById {
    pub pin_id: Uuid,
}

impl Processor<GetPinById> for DatabaseProcessor {
    type Output = Option<Pin>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetPinById")]
    async fn process(&self, query: GetPinById) -> Result<Option<Pin>, sqlx::Error> {
        sqlx::query_as::<_, Pin>(
            r#"
            SELECT id, team_id, document_id, collection_id, created_by_id, "index",
                   created_at, updated_at
            FROM pins
            WHERE id = $1
            "#,
        )
        .bind(query.pin_id)
        .fetch_optional(&self.pool)
        .await
    }
}
