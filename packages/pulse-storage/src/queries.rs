use sqlx::{PgPool, Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
	Result,
	models::{Campaign, DeliveryRecord, SurveyInstance, SurveyResponse, User},
};

// Administrative-store reads. The admin subsystem owns these tables; the
// core only consumes them through this boundary.

pub async fn active_campaigns(pool: &PgPool, as_of: Date) -> Result<Vec<Campaign>> {
	let campaigns = sqlx::query_as::<_, Campaign>(
		"\
SELECT *
FROM campaigns
WHERE is_active AND start_date <= $1 AND end_date >= $1
ORDER BY created_at ASC",
	)
	.bind(as_of)
	.fetch_all(pool)
	.await?;

	Ok(campaigns)
}

/// Enrollment is campaign-wide: every active user participates in every
/// running campaign. The campaign id keeps the boundary contract stable for
/// a real enrollment store.
pub async fn enrolled_users(pool: &PgPool, _campaign_id: Uuid) -> Result<Vec<User>> {
	let users =
		sqlx::query_as::<_, User>("SELECT * FROM users WHERE is_active ORDER BY created_at ASC")
			.fetch_all(pool)
			.await?;

	Ok(users)
}

pub async fn user_by_phone(pool: &PgPool, phone: &str) -> Result<Option<User>> {
	let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone_number = $1")
		.bind(phone)
		.fetch_optional(pool)
		.await?;

	Ok(user)
}

pub async fn user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>> {
	let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
		.bind(user_id)
		.fetch_optional(pool)
		.await?;

	Ok(user)
}

pub async fn campaign_by_id(pool: &PgPool, campaign_id: Uuid) -> Result<Option<Campaign>> {
	let campaign = sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE campaign_id = $1")
		.bind(campaign_id)
		.fetch_optional(pool)
		.await?;

	Ok(campaign)
}

pub async fn campaign_by_name(pool: &PgPool, name: &str) -> Result<Option<Campaign>> {
	let campaign = sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE name = $1 LIMIT 1")
		.bind(name)
		.fetch_optional(pool)
		.await?;

	Ok(campaign)
}

pub async fn insert_user(pool: &PgPool, user: &User) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO users (user_id, name, phone_number, is_active, created_at)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(user.user_id)
	.bind(user.name.as_str())
	.bind(user.phone_number.as_str())
	.bind(user.is_active)
	.bind(user.created_at)
	.execute(pool)
	.await?;

	Ok(())
}

pub async fn insert_campaign(pool: &PgPool, campaign: &Campaign) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO campaigns (campaign_id, name, description, start_date, end_date, is_active, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(campaign.campaign_id)
	.bind(campaign.name.as_str())
	.bind(campaign.description.as_deref())
	.bind(campaign.start_date)
	.bind(campaign.end_date)
	.bind(campaign.is_active)
	.bind(campaign.created_at)
	.execute(pool)
	.await?;

	Ok(())
}

// Survey instances. The UNIQUE (user_id, campaign_id, survey_date) key and
// the status-guarded UPDATE are the two atomic primitives everything else
// leans on.

/// Returns true when this call created the instance; false means it already
/// existed and the caller must not dispatch again.
pub async fn create_survey_instance(
	pool: &PgPool,
	instance_id: Uuid,
	user_id: Uuid,
	campaign_id: Uuid,
	survey_date: Date,
) -> Result<bool> {
	let result = sqlx::query(
		"\
INSERT INTO survey_instances (instance_id, user_id, campaign_id, survey_date, status)
VALUES ($1, $2, $3, $4, 'pending')
ON CONFLICT (user_id, campaign_id, survey_date) DO NOTHING",
	)
	.bind(instance_id)
	.bind(user_id)
	.bind(campaign_id)
	.bind(survey_date)
	.execute(pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn latest_pending_instance(
	pool: &PgPool,
	user_id: Uuid,
) -> Result<Option<SurveyInstance>> {
	let instance = sqlx::query_as::<_, SurveyInstance>(
		"\
SELECT si.*
FROM survey_instances si
JOIN campaigns c ON c.campaign_id = si.campaign_id
WHERE si.user_id = $1 AND si.status = 'pending' AND c.is_active
ORDER BY si.survey_date DESC, si.created_at DESC
LIMIT 1",
	)
	.bind(user_id)
	.fetch_optional(pool)
	.await?;

	Ok(instance)
}

pub async fn latest_instance(pool: &PgPool, user_id: Uuid) -> Result<Option<SurveyInstance>> {
	let instance = sqlx::query_as::<_, SurveyInstance>(
		"\
SELECT *
FROM survey_instances
WHERE user_id = $1
ORDER BY survey_date DESC, created_at DESC
LIMIT 1",
	)
	.bind(user_id)
	.fetch_optional(pool)
	.await?;

	Ok(instance)
}

pub async fn instance_by_id(pool: &PgPool, instance_id: Uuid) -> Result<Option<SurveyInstance>> {
	let instance =
		sqlx::query_as::<_, SurveyInstance>("SELECT * FROM survey_instances WHERE instance_id = $1")
			.bind(instance_id)
			.fetch_optional(pool)
			.await?;

	Ok(instance)
}

/// Compare-and-set `pending` -> `answered`. Returns false when the instance
/// was not pending anymore; the losing racer must not write a response.
pub async fn mark_instance_answered_tx(
	tx: &mut Transaction<'_, Postgres>,
	instance_id: Uuid,
	now: OffsetDateTime,
) -> Result<bool> {
	let result = sqlx::query(
		"\
UPDATE survey_instances
SET status = 'answered', answered_at = $1
WHERE instance_id = $2 AND status = 'pending'",
	)
	.bind(now)
	.bind(instance_id)
	.execute(&mut **tx)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn expire_pending_instances_before(pool: &PgPool, cutoff: Date) -> Result<u64> {
	let result = sqlx::query(
		"UPDATE survey_instances SET status = 'expired' WHERE status = 'pending' AND survey_date < $1",
	)
	.bind(cutoff)
	.execute(pool)
	.await?;

	Ok(result.rows_affected())
}

// Responses. One per instance, first valid reply wins.

pub async fn insert_response_tx(
	tx: &mut Transaction<'_, Postgres>,
	response: &SurveyResponse,
) -> Result<bool> {
	let result = sqlx::query(
		"\
INSERT INTO responses (
	response_id,
	instance_id,
	user_id,
	campaign_id,
	survey_date,
	joy,
	achievement,
	meaningfulness,
	influence_text,
	submitted_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
ON CONFLICT (instance_id) DO NOTHING",
	)
	.bind(response.response_id)
	.bind(response.instance_id)
	.bind(response.user_id)
	.bind(response.campaign_id)
	.bind(response.survey_date)
	.bind(response.joy)
	.bind(response.achievement)
	.bind(response.meaningfulness)
	.bind(response.influence_text.as_str())
	.bind(response.submitted_at)
	.execute(&mut **tx)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn answered_responses(
	pool: &PgPool,
	user_id: Uuid,
	campaign_id: Uuid,
) -> Result<Vec<SurveyResponse>> {
	let responses = sqlx::query_as::<_, SurveyResponse>(
		"\
SELECT r.*
FROM responses r
JOIN survey_instances si ON si.instance_id = r.instance_id
WHERE r.user_id = $1 AND r.campaign_id = $2 AND si.status = 'answered'
ORDER BY r.survey_date ASC",
	)
	.bind(user_id)
	.bind(campaign_id)
	.fetch_all(pool)
	.await?;

	Ok(responses)
}

pub async fn response_for_instance(
	pool: &PgPool,
	instance_id: Uuid,
) -> Result<Option<SurveyResponse>> {
	let response =
		sqlx::query_as::<_, SurveyResponse>("SELECT * FROM responses WHERE instance_id = $1")
			.bind(instance_id)
			.fetch_optional(pool)
			.await?;

	Ok(response)
}

// Delivery records: one row per outbound message, retry bookkeeping.

pub async fn insert_delivery_record(
	pool: &PgPool,
	delivery_id: Uuid,
	to_phone: &str,
	kind: &str,
	body: &str,
	instance_id: Option<Uuid>,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO delivery_records (delivery_id, to_phone, kind, body, status, instance_id)
VALUES ($1, $2, $3, $4, 'queued', $5)",
	)
	.bind(delivery_id)
	.bind(to_phone)
	.bind(kind)
	.bind(body)
	.bind(instance_id)
	.execute(pool)
	.await?;

	Ok(())
}

pub async fn record_delivery_attempt(
	pool: &PgPool,
	delivery_id: Uuid,
	status: &str,
	provider_message_id: Option<&str>,
	last_error: Option<&str>,
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
UPDATE delivery_records
SET attempts = attempts + 1,
	status = $1,
	provider_message_id = COALESCE($2, provider_message_id),
	last_error = $3,
	updated_at = $4
WHERE delivery_id = $5",
	)
	.bind(status)
	.bind(provider_message_id)
	.bind(last_error)
	.bind(now)
	.bind(delivery_id)
	.execute(pool)
	.await?;

	Ok(())
}

pub async fn delivery_record(pool: &PgPool, delivery_id: Uuid) -> Result<Option<DeliveryRecord>> {
	let record =
		sqlx::query_as::<_, DeliveryRecord>("SELECT * FROM delivery_records WHERE delivery_id = $1")
			.bind(delivery_id)
			.fetch_optional(pool)
			.await?;

	Ok(record)
}

pub async fn delivery_records_for_instance(
	pool: &PgPool,
	instance_id: Uuid,
) -> Result<Vec<DeliveryRecord>> {
	let records = sqlx::query_as::<_, DeliveryRecord>(
		"SELECT * FROM delivery_records WHERE instance_id = $1 ORDER BY created_at ASC",
	)
	.bind(instance_id)
	.fetch_all(pool)
	.await?;

	Ok(records)
}

pub async fn purge_delivery_records_before(pool: &PgPool, cutoff: OffsetDateTime) -> Result<u64> {
	let result = sqlx::query("DELETE FROM delivery_records WHERE created_at < $1")
		.bind(cutoff)
		.execute(pool)
		.await?;

	Ok(result.rows_affected())
}

// Inbound message log: the at-most-once gate for provider redeliveries.

/// Returns false when the provider message id was already claimed; the
/// caller must treat the message as a duplicate and do nothing.
pub async fn claim_inbound_message(
	pool: &PgPool,
	provider_message_id: &str,
	from_phone: &str,
	body: &str,
) -> Result<bool> {
	let result = sqlx::query(
		"\
INSERT INTO inbound_messages (provider_message_id, from_phone, body)
VALUES ($1, $2, $3)
ON CONFLICT (provider_message_id) DO NOTHING",
	)
	.bind(provider_message_id)
	.bind(from_phone)
	.bind(body)
	.execute(pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn finish_inbound_message(
	pool: &PgPool,
	provider_message_id: &str,
	outcome: &str,
) -> Result<()> {
	sqlx::query("UPDATE inbound_messages SET outcome = $1 WHERE provider_message_id = $2")
		.bind(outcome)
		.bind(provider_message_id)
		.execute(pool)
		.await?;

	Ok(())
}

// Dispatch-run markers: "has today's cycle run" lives in the store so
// restarts are safe.

pub async fn dispatch_run_exists(pool: &PgPool, run_date: Date) -> Result<bool> {
	let exists: bool =
		sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM dispatch_runs WHERE run_date = $1)")
			.bind(run_date)
			.fetch_one(pool)
			.await?;

	Ok(exists)
}

pub async fn record_dispatch_run(
	pool: &PgPool,
	run_date: Date,
	dispatched: i32,
	failed: i32,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO dispatch_runs (run_date, dispatched, failed)
VALUES ($1, $2, $3)
ON CONFLICT (run_date) DO UPDATE
SET completed_at = now(),
	dispatched = dispatch_runs.dispatched + EXCLUDED.dispatched,
	failed = dispatch_runs.failed + EXCLUDED.failed",
	)
	.bind(run_date)
	.bind(dispatched)
	.bind(failed)
	.execute(pool)
	.await?;

	Ok(())
}
