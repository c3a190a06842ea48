use time::macros::date;
use uuid::Uuid;

use pulse_domain::insights::Dimension;
use pulse_service::{Error, InboundOutcome};

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn insights_aggregate_two_consecutive_days() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, _mock) =
		super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let user = super::seed_user(&service, super::TEST_PHONE).await;
	let campaign = super::seed_campaign(&service).await;
	let shutdown = super::no_shutdown();

	for (day, reply, sid) in [
		(date!(2026 - 01 - 04), "8/7/9/family", "SM800"),
		(date!(2026 - 01 - 05), "6/8/7/work", "SM801"),
	] {
		service.run_daily_cycle(day, &shutdown).await.expect("Cycle failed.");

		let outcome = service
			.handle_inbound_message(super::TEST_PHONE, reply, sid)
			.await
			.expect("Inbound handling failed.");

		assert!(matches!(outcome, InboundOutcome::Recorded { .. }));
	}

	let report = service
		.compute_insights(user.user_id, campaign.campaign_id)
		.await
		.expect("Insights failed.");

	assert_eq!(report.analytics.response_count, 2);
	assert_eq!(report.analytics.avg_joy, 7.0);
	assert_eq!(report.analytics.avg_achievement, 7.5);
	assert_eq!(report.analytics.avg_meaningfulness, 8.0);
	assert_eq!(report.analytics.overall, 7.5);
	assert_eq!(report.analytics.strongest, Some(Dimension::Meaningfulness));
	assert_eq!(report.analytics.weakest, Some(Dimension::Joy));
	assert_eq!(report.analytics.streak_days, 2);

	// Responses are listed newest first.
	assert_eq!(report.responses.len(), 2);
	assert_eq!(report.responses[0].survey_date, date!(2026 - 01 - 05));
	assert_eq!(report.responses[0].influence_text, "work");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn insights_over_an_empty_history_is_the_zero_summary() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, _mock) =
		super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let user = super::seed_user(&service, super::TEST_PHONE).await;
	let campaign = super::seed_campaign(&service).await;
	let report = service
		.compute_insights(user.user_id, campaign.campaign_id)
		.await
		.expect("Insights over an empty history must not fail.");

	assert_eq!(report.analytics.response_count, 0);
	assert_eq!(report.analytics.avg_joy, 0.0);
	assert_eq!(report.analytics.overall, 0.0);
	assert_eq!(report.analytics.streak_days, 0);
	assert!(report.responses.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn insights_for_an_unknown_user_is_not_found() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, _mock) =
		super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let campaign = super::seed_campaign(&service).await;
	let result = service.compute_insights(Uuid::new_v4(), campaign.campaign_id).await;

	assert!(matches!(result, Err(Error::NotFound { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
