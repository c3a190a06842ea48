use time::macros::date;

use pulse_storage::queries;

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn rerunning_the_cycle_dispatches_once_per_user_and_date() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, mock) = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let user = super::seed_user(&service, super::TEST_PHONE).await;
	let campaign = super::seed_campaign(&service).await;
	let as_of = date!(2026 - 01 - 05);
	let shutdown = super::no_shutdown();

	let first = service.run_daily_cycle(as_of, &shutdown).await.expect("First cycle failed.");
	let second = service.run_daily_cycle(as_of, &shutdown).await.expect("Second cycle failed.");

	assert_eq!(first.dispatched, 1);
	assert_eq!(first.failed, 0);
	assert_eq!(second.dispatched, 0);
	assert_eq!(second.skipped, 1);

	// Exactly one instance and one outbound send for (user, campaign, date).
	let sent = mock.sent();

	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].to, user.phone_number);
	assert!(sent[0].body.contains("Daily Wellbeing Check-in"));

	let instance = queries::latest_pending_instance(&service.db.pool, user.user_id)
		.await
		.expect("Instance lookup failed.")
		.expect("Expected a pending instance.");

	assert_eq!(instance.campaign_id, campaign.campaign_id);
	assert_eq!(instance.survey_date, as_of);

	assert!(
		queries::dispatch_run_exists(&service.db.pool, as_of)
			.await
			.expect("Marker lookup failed.")
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn dispatch_writes_a_sent_delivery_record() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, _mock) =
		super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let user = super::seed_user(&service, super::TEST_PHONE).await;
	let _campaign = super::seed_campaign(&service).await;
	let as_of = date!(2026 - 01 - 05);
	let shutdown = super::no_shutdown();

	service.run_daily_cycle(as_of, &shutdown).await.expect("Cycle failed.");

	let instance = queries::latest_pending_instance(&service.db.pool, user.user_id)
		.await
		.expect("Instance lookup failed.")
		.expect("Expected a pending instance.");
	let records = queries::delivery_records_for_instance(&service.db.pool, instance.instance_id)
		.await
		.expect("Delivery lookup failed.");

	assert_eq!(records.len(), 1);
	assert_eq!(records[0].status, "sent");
	assert_eq!(records[0].kind, "survey");
	assert_eq!(records[0].attempts, 1);
	assert_eq!(records[0].provider_message_id.as_deref(), Some("mock-1"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn campaigns_outside_their_window_are_not_dispatched() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, mock) = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let _user = super::seed_user(&service, super::TEST_PHONE).await;
	let _campaign = super::seed_campaign(&service).await;
	let shutdown = super::no_shutdown();

	// The seeded campaign runs through 2026 only.
	let report =
		service.run_daily_cycle(date!(2027 - 06 - 01), &shutdown).await.expect("Cycle failed.");

	assert_eq!(report.dispatched, 0);
	assert_eq!(report.skipped, 0);
	assert!(mock.sent().is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
