use std::{sync::Arc, time::Duration as StdDuration};

use color_eyre::{Result, eyre};
use time::{Duration, OffsetDateTime, Time};
use tokio::{sync::watch, time as tokio_time};

use pulse_service::SurveyService;
use pulse_storage::queries;

const SWEEP_INTERVAL_SECONDS: i64 = 3_600;

pub struct WorkerState {
	pub service: Arc<SurveyService>,
	pub shutdown: watch::Receiver<bool>,
}

/// The scheduler daemon: polls until the configured time-of-day has passed,
/// runs the daily cycle exactly once per date (the completion marker lives
/// in the store, so restarts are safe), and interleaves hourly lifecycle
/// sweeps.
pub async fn run_worker(state: WorkerState) -> Result<()> {
	let mut shutdown = state.shutdown.clone();
	let poll = StdDuration::from_secs(state.service.cfg.scheduler.poll_interval_secs);
	let mut last_sweep = OffsetDateTime::now_utc() - Duration::seconds(SWEEP_INTERVAL_SECONDS);

	loop {
		if *shutdown.borrow() {
			tracing::info!("Shutdown requested. Worker loop stopping.");

			return Ok(());
		}

		let now = OffsetDateTime::now_utc();

		if let Err(err) = dispatch_if_due(&state.service, &shutdown, now).await {
			tracing::error!(error = %err, "Dispatch pass failed.");
		}
		if now - last_sweep >= Duration::seconds(SWEEP_INTERVAL_SECONDS) {
			if let Err(err) = run_sweeps(&state.service, now).await {
				tracing::error!(error = %err, "Lifecycle sweep failed.");
			} else {
				last_sweep = now;
			}
		}

		tokio::select! {
			_ = tokio_time::sleep(poll) => {},
			_ = shutdown.changed() => {},
		}
	}
}

async fn dispatch_if_due(
	service: &SurveyService,
	shutdown: &watch::Receiver<bool>,
	now: OffsetDateTime,
) -> Result<()> {
	let dispatch_at = dispatch_time(&service.cfg.scheduler)?;

	if !due_for_dispatch(now, dispatch_at) {
		return Ok(());
	}

	let today = now.date();

	if queries::dispatch_run_exists(&service.db.pool, today).await? {
		return Ok(());
	}

	tracing::info!(date = %today, "Dispatch time reached. Running daily cycle.");

	let report = service.run_daily_cycle(today, shutdown).await?;

	if report.aborted {
		tracing::warn!(date = %today, "Daily cycle aborted by shutdown. It resumes on restart.");
	}

	Ok(())
}

async fn run_sweeps(service: &SurveyService, now: OffsetDateTime) -> Result<()> {
	let expiry_cutoff = now.date() - Duration::days(service.cfg.lifecycle.pending_expiry_days);
	let expired =
		queries::expire_pending_instances_before(&service.db.pool, expiry_cutoff).await?;

	if expired > 0 {
		tracing::info!(count = expired, "Expired stale pending surveys.");
	}

	let purge_cutoff = now - Duration::days(service.cfg.lifecycle.purge_delivery_after_days);
	let purged = queries::purge_delivery_records_before(&service.db.pool, purge_cutoff).await?;

	if purged > 0 {
		tracing::info!(count = purged, "Purged old delivery records.");
	}

	Ok(())
}

fn dispatch_time(scheduler: &pulse_config::Scheduler) -> Result<Time> {
	Time::from_hms(scheduler.dispatch_hour, scheduler.dispatch_minute, 0)
		.map_err(|err| eyre::eyre!("Invalid dispatch time: {err}."))
}

fn due_for_dispatch(now: OffsetDateTime, dispatch_at: Time) -> bool {
	now.time() >= dispatch_at
}
