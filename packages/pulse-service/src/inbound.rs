use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use pulse_domain::{phone, reply, template};
use pulse_storage::{
	models::{SurveyResponse, User},
	queries,
};

use crate::{Result, SurveyService, dispatch};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InboundOutcome {
	Recorded { instance_id: Uuid, user_id: Uuid, campaign_id: Uuid },
	DuplicateDelivery,
	UnknownSender,
	NoPendingSurvey,
	AlreadyAnswered,
	RejectedReply { reason: String },
}
impl InboundOutcome {
	fn label(&self) -> &'static str {
		match self {
			Self::Recorded { .. } => "recorded",
			Self::DuplicateDelivery => "duplicate",
			Self::UnknownSender => "unknown_sender",
			Self::NoPendingSurvey => "no_pending_survey",
			Self::AlreadyAnswered => "already_answered",
			Self::RejectedReply { .. } => "rejected",
		}
	}
}

impl SurveyService {
	/// Interprets one provider callback. Every outcome is terminal from the
	/// provider's point of view: user-correctable problems are answered with
	/// a guiding reply (or a silent log for unknown senders), never an error.
	pub async fn handle_inbound_message(
		&self,
		from: &str,
		raw_body: &str,
		provider_message_id: &str,
	) -> Result<InboundOutcome> {
		let claimed = queries::claim_inbound_message(
			&self.db.pool,
			provider_message_id,
			from,
			raw_body,
		)
		.await?;

		if !claimed {
			tracing::info!(%provider_message_id, "Duplicate provider callback. Ignoring.");

			return Ok(InboundOutcome::DuplicateDelivery);
		}

		let outcome = self.interpret(from, raw_body).await?;

		queries::finish_inbound_message(&self.db.pool, provider_message_id, outcome.label())
			.await?;

		Ok(outcome)
	}

	async fn interpret(&self, from: &str, raw_body: &str) -> Result<InboundOutcome> {
		let Ok(sender_phone) = phone::canonicalize(from) else {
			tracing::warn!(%from, "Inbound message from a malformed phone number.");

			return Ok(InboundOutcome::UnknownSender);
		};
		let Some(user) = queries::user_by_phone(&self.db.pool, &sender_phone).await? else {
			// No reply: an unknown sender learns nothing about this system.
			tracing::warn!("Inbound message from an unknown sender.");

			return Ok(InboundOutcome::UnknownSender);
		};
		let Some(instance) = queries::latest_pending_instance(&self.db.pool, user.user_id).await?
		else {
			return self.reply_without_pending(&user).await;
		};
		let parsed = match reply::parse_reply(raw_body) {
			Ok(parsed) => parsed,
			Err(err) => {
				// The instance stays pending; the participant may retry.
				self.send_prompt(
					&user,
					"corrective",
					&template::corrective_message(&err),
					Some(instance.instance_id),
				)
				.await;

				return Ok(InboundOutcome::RejectedReply { reason: err.to_string() });
			},
		};
		let now = OffsetDateTime::now_utc();
		let response = SurveyResponse {
			response_id: Uuid::new_v4(),
			instance_id: instance.instance_id,
			user_id: user.user_id,
			campaign_id: instance.campaign_id,
			survey_date: instance.survey_date,
			joy: parsed.joy as i32,
			achievement: parsed.achievement as i32,
			meaningfulness: parsed.meaningfulness as i32,
			influence_text: parsed.influence,
			submitted_at: now,
		};
		let mut tx = self.db.pool.begin().await?;
		let answered =
			queries::mark_instance_answered_tx(&mut tx, instance.instance_id, now).await?;

		if !answered {
			// Lost the race: another reply answered this instance first. The
			// stored response must not be overwritten.
			tx.rollback().await?;
			self.send_prompt(
				&user,
				"corrective",
				&template::already_answered_message(),
				Some(instance.instance_id),
			)
			.await;

			return Ok(InboundOutcome::AlreadyAnswered);
		}

		let inserted = queries::insert_response_tx(&mut tx, &response).await?;

		if !inserted {
			tx.rollback().await?;

			return Ok(InboundOutcome::AlreadyAnswered);
		}

		tx.commit().await?;
		tracing::info!(
			user_id = %user.user_id,
			instance_id = %instance.instance_id,
			survey_date = %instance.survey_date,
			"Response recorded.",
		);

		let url = self.insights_url(user.user_id, instance.campaign_id);

		self.send_prompt(
			&user,
			"confirmation",
			&template::confirmation_message(&url),
			Some(instance.instance_id),
		)
		.await;

		Ok(InboundOutcome::Recorded {
			instance_id: instance.instance_id,
			user_id: user.user_id,
			campaign_id: instance.campaign_id,
		})
	}

	async fn reply_without_pending(&self, user: &User) -> Result<InboundOutcome> {
		let latest = queries::latest_instance(&self.db.pool, user.user_id).await?;

		if latest.map(|instance| instance.status == "answered").unwrap_or(false) {
			self.send_prompt(user, "corrective", &template::already_answered_message(), None).await;

			return Ok(InboundOutcome::AlreadyAnswered);
		}

		self.send_prompt(user, "corrective", &template::no_pending_message(), None).await;

		Ok(InboundOutcome::NoPendingSurvey)
	}

	/// Prompt failures are logged and recorded on their DeliveryRecord; they
	/// never fail inbound handling.
	async fn send_prompt(&self, user: &User, kind: &str, body: &str, instance_id: Option<Uuid>) {
		if let Err(err) = dispatch::deliver(
			&self.db.pool,
			self.sender.as_ref(),
			&self.cfg.gateway,
			&user.phone_number,
			kind,
			body,
			instance_id,
		)
		.await
		{
			tracing::error!(error = %err, user_id = %user.user_id, "Failed to send reply prompt.");
		}
	}
}
