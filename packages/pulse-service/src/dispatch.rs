use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use tokio::{
	sync::{Semaphore, watch},
	task::JoinSet,
	time as tokio_time,
};
use uuid::Uuid;

use pulse_domain::template;
use pulse_gateway::Sender;
use pulse_storage::queries;

use crate::{Error, Result, SurveyService};

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct CycleReport {
	pub dispatched: u32,
	pub skipped: u32,
	pub failed: u32,
	pub aborted: bool,
}

impl SurveyService {
	/// One scheduling pass for `as_of`: every enrolled user of every running
	/// campaign gets a survey instance and an outbound survey, unless the
	/// instance already exists. Re-running the cycle for the same date is a
	/// no-op for users already dispatched, so a crashed cycle resumes by
	/// simply running again.
	///
	/// A per-recipient send failure is recorded and counted, never fatal to
	/// the rest of the cycle. The shutdown signal is honored between users;
	/// in-flight sends drain before the report is returned.
	pub async fn run_daily_cycle(
		&self,
		as_of: Date,
		shutdown: &watch::Receiver<bool>,
	) -> Result<CycleReport> {
		let campaigns = queries::active_campaigns(&self.db.pool, as_of).await?;
		let semaphore = Arc::new(Semaphore::new(self.cfg.scheduler.send_concurrency as usize));
		let mut sends = JoinSet::new();
		let mut report = CycleReport::default();

		'campaigns: for campaign in &campaigns {
			let users = queries::enrolled_users(&self.db.pool, campaign.campaign_id).await?;

			for user in users {
				if *shutdown.borrow() {
					tracing::info!("Shutdown requested. Aborting dispatch cycle between users.");

					report.aborted = true;

					break 'campaigns;
				}

				let instance_id = Uuid::new_v4();
				let created = queries::create_survey_instance(
					&self.db.pool,
					instance_id,
					user.user_id,
					campaign.campaign_id,
					as_of,
				)
				.await?;

				if !created {
					report.skipped += 1;

					continue;
				}

				let Ok(permit) = semaphore.clone().acquire_owned().await else {
					report.aborted = true;

					break 'campaigns;
				};
				let pool = self.db.pool.clone();
				let sender = self.sender.clone();
				let gateway = self.cfg.gateway.clone();
				let to = user.phone_number.clone();
				let body = template::survey_message(&user.name, as_of);

				sends.spawn(async move {
					let _permit = permit;
					let result = deliver(
						&pool,
						sender.as_ref(),
						&gateway,
						&to,
						"survey",
						&body,
						Some(instance_id),
					)
					.await;

					if let Err(err) = &result {
						tracing::error!(error = %err, %to, "Survey dispatch failed.");
					}

					result.is_ok()
				});
			}
		}

		while let Some(joined) = sends.join_next().await {
			match joined {
				Ok(true) => report.dispatched += 1,
				Ok(false) => report.failed += 1,
				Err(err) => {
					report.failed += 1;

					tracing::error!(error = %err, "Dispatch task failed to complete.");
				},
			}
		}

		if !report.aborted {
			queries::record_dispatch_run(
				&self.db.pool,
				as_of,
				report.dispatched as i32,
				report.failed as i32,
			)
			.await?;
		}

		tracing::info!(
			date = %as_of,
			dispatched = report.dispatched,
			skipped = report.skipped,
			failed = report.failed,
			aborted = report.aborted,
			"Dispatch cycle finished.",
		);

		Ok(report)
	}
}

/// Sends one message through the gateway, keeping the DeliveryRecord current
/// on every attempt. Transient failures back off and retry up to the
/// configured cap; permanent failures and exhaustion mark the record
/// `failed` and surface the error.
pub(crate) async fn deliver(
	pool: &PgPool,
	sender: &dyn Sender,
	gateway: &pulse_config::Gateway,
	to: &str,
	kind: &str,
	body: &str,
	instance_id: Option<Uuid>,
) -> Result<Uuid> {
	let delivery_id = Uuid::new_v4();

	queries::insert_delivery_record(pool, delivery_id, to, kind, body, instance_id).await?;

	let mut attempt = 0;

	loop {
		attempt += 1;

		match sender.send(to, body).await {
			Ok(receipt) => {
				queries::record_delivery_attempt(
					pool,
					delivery_id,
					"sent",
					Some(receipt.provider_message_id.as_str()),
					None,
					OffsetDateTime::now_utc(),
				)
				.await?;

				return Ok(delivery_id);
			},
			Err(err) if err.is_transient() && attempt < gateway.max_attempts => {
				let message = err.to_string();

				queries::record_delivery_attempt(
					pool,
					delivery_id,
					"queued",
					None,
					Some(message.as_str()),
					OffsetDateTime::now_utc(),
				)
				.await?;
				tracing::warn!(error = %err, %to, attempt, "Transient send failure. Retrying.");
				tokio_time::sleep(pulse_gateway::backoff_for_attempt(
					attempt,
					gateway.base_backoff_ms,
					gateway.max_backoff_ms,
				))
				.await;
			},
			Err(err) => {
				let message = err.to_string();

				queries::record_delivery_attempt(
					pool,
					delivery_id,
					"failed",
					None,
					Some(message.as_str()),
					OffsetDateTime::now_utc(),
				)
				.await?;

				return Err(Error::Delivery { message });
			},
		}
	}
}
