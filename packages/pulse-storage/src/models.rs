use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	pub user_id: Uuid,
	pub name: String,
	pub phone_number: String,
	pub is_active: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Campaign {
	pub campaign_id: Uuid,
	pub name: String,
	pub description: Option<String>,
	pub start_date: Date,
	pub end_date: Date,
	pub is_active: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SurveyInstance {
	pub instance_id: Uuid,
	pub user_id: Uuid,
	pub campaign_id: Uuid,
	pub survey_date: Date,
	pub status: String,
	pub created_at: OffsetDateTime,
	pub answered_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SurveyResponse {
	pub response_id: Uuid,
	pub instance_id: Uuid,
	pub user_id: Uuid,
	pub campaign_id: Uuid,
	pub survey_date: Date,
	pub joy: i32,
	pub achievement: i32,
	pub meaningfulness: i32,
	pub influence_text: String,
	pub submitted_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeliveryRecord {
	pub delivery_id: Uuid,
	pub to_phone: String,
	pub kind: String,
	pub body: String,
	pub provider_message_id: Option<String>,
	pub status: String,
	pub attempts: i32,
	pub last_error: Option<String>,
	pub instance_id: Option<Uuid>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
