use time::macros::date;
use uuid::Uuid;

use pulse_service::InboundOutcome;
use pulse_storage::queries;

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn valid_reply_records_the_response_and_confirms() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, mock) = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let user = super::seed_user(&service, super::TEST_PHONE).await;
	let campaign = super::seed_campaign(&service).await;
	let shutdown = super::no_shutdown();

	service.run_daily_cycle(date!(2026 - 01 - 05), &shutdown).await.expect("Cycle failed.");

	let outcome = service
		.handle_inbound_message(super::TEST_PHONE, "8/7/9/Spent time with family", "SM100")
		.await
		.expect("Inbound handling failed.");
	let InboundOutcome::Recorded { instance_id, .. } = outcome else {
		panic!("Expected Recorded, got {outcome:?}");
	};
	let response = queries::response_for_instance(&service.db.pool, instance_id)
		.await
		.expect("Response lookup failed.")
		.expect("Expected a stored response.");

	assert_eq!(response.joy, 8);
	assert_eq!(response.achievement, 7);
	assert_eq!(response.meaningfulness, 9);
	assert_eq!(response.influence_text, "Spent time with family");

	let instance = queries::instance_by_id(&service.db.pool, instance_id)
		.await
		.expect("Instance lookup failed.")
		.expect("Expected the instance.");

	assert_eq!(instance.status, "answered");

	// Survey first, then the confirmation with the personal insights link.
	let sent = mock.sent();

	assert_eq!(sent.len(), 2);
	assert!(sent[1].body.contains(&format!("/feedback/{}/{}", user.user_id, campaign.campaign_id)));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn duplicate_provider_callback_is_a_no_op() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, mock) = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let _user = super::seed_user(&service, super::TEST_PHONE).await;
	let _campaign = super::seed_campaign(&service).await;
	let shutdown = super::no_shutdown();

	service.run_daily_cycle(date!(2026 - 01 - 05), &shutdown).await.expect("Cycle failed.");

	let first = service
		.handle_inbound_message(super::TEST_PHONE, "8/7/9/walk", "SM200")
		.await
		.expect("Inbound handling failed.");

	assert!(matches!(first, InboundOutcome::Recorded { .. }));

	let sent_before = mock.sent().len();
	let redelivered = service
		.handle_inbound_message(super::TEST_PHONE, "8/7/9/walk", "SM200")
		.await
		.expect("Redelivery handling failed.");

	assert!(matches!(redelivered, InboundOutcome::DuplicateDelivery));
	// No second response, no second confirmation.
	assert_eq!(mock.sent().len(), sent_before);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn second_reply_never_overwrites_the_first() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, _mock) =
		super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let _user = super::seed_user(&service, super::TEST_PHONE).await;
	let _campaign = super::seed_campaign(&service).await;
	let shutdown = super::no_shutdown();

	service.run_daily_cycle(date!(2026 - 01 - 05), &shutdown).await.expect("Cycle failed.");

	let first = service
		.handle_inbound_message(super::TEST_PHONE, "8/7/9/first answer", "SM300")
		.await
		.expect("Inbound handling failed.");
	let InboundOutcome::Recorded { instance_id, .. } = first else {
		panic!("Expected Recorded, got {first:?}");
	};
	let second = service
		.handle_inbound_message(super::TEST_PHONE, "1/1/1/second answer", "SM301")
		.await
		.expect("Second inbound handling failed.");

	assert!(matches!(second, InboundOutcome::AlreadyAnswered));

	let response = queries::response_for_instance(&service.db.pool, instance_id)
		.await
		.expect("Response lookup failed.")
		.expect("Expected a stored response.");

	assert_eq!(response.joy, 8);
	assert_eq!(response.influence_text, "first answer");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn invalid_rating_keeps_the_instance_pending() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, mock) = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let user = super::seed_user(&service, super::TEST_PHONE).await;
	let _campaign = super::seed_campaign(&service).await;
	let shutdown = super::no_shutdown();

	service.run_daily_cycle(date!(2026 - 01 - 05), &shutdown).await.expect("Cycle failed.");

	let outcome = service
		.handle_inbound_message(super::TEST_PHONE, "12/5/9/ok", "SM400")
		.await
		.expect("Inbound handling failed.");
	let InboundOutcome::RejectedReply { reason } = outcome else {
		panic!("Expected RejectedReply, got {outcome:?}");
	};

	assert!(reason.contains("joy"));

	let instance = queries::latest_pending_instance(&service.db.pool, user.user_id)
		.await
		.expect("Instance lookup failed.")
		.expect("Expected the instance to stay pending.");

	assert_eq!(instance.status, "pending");

	// The corrective prompt names the failure and repeats the format.
	let sent = mock.sent();
	let corrective = &sent[sent.len() - 1].body;

	assert!(corrective.contains("joy"));
	assert!(corrective.contains("joy/achievement/meaningfulness/influence"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn unknown_sender_gets_no_reply() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, mock) = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let outcome = service
		.handle_inbound_message("+19990000000", "8/7/9/hi", "SM500")
		.await
		.expect("Inbound handling failed.");

	assert!(matches!(outcome, InboundOutcome::UnknownSender));
	assert!(mock.sent().is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn known_sender_without_a_pending_survey_gets_a_neutral_prompt() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, mock) = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let _user = super::seed_user(&service, super::TEST_PHONE).await;
	let outcome = service
		.handle_inbound_message(super::TEST_PHONE, "8/7/9/hi", "SM600")
		.await
		.expect("Inbound handling failed.");

	assert!(matches!(outcome, InboundOutcome::NoPendingSurvey));

	let sent = mock.sent();

	assert_eq!(sent.len(), 1);
	assert!(sent[0].body.contains("no survey awaiting your reply"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn reply_resolves_to_the_most_recent_pending_instance() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, _mock) =
		super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let user = super::seed_user(&service, super::TEST_PHONE).await;
	let campaign = super::seed_campaign(&service).await;

	for day in [date!(2026 - 01 - 04), date!(2026 - 01 - 05)] {
		queries::create_survey_instance(
			&service.db.pool,
			Uuid::new_v4(),
			user.user_id,
			campaign.campaign_id,
			day,
		)
		.await
		.expect("Instance creation failed.");
	}

	let outcome = service
		.handle_inbound_message(super::TEST_PHONE, "5/5/5/latest", "SM700")
		.await
		.expect("Inbound handling failed.");
	let InboundOutcome::Recorded { instance_id, .. } = outcome else {
		panic!("Expected Recorded, got {outcome:?}");
	};
	let instance = queries::instance_by_id(&service.db.pool, instance_id)
		.await
		.expect("Instance lookup failed.")
		.expect("Expected the instance.");

	assert_eq!(instance.survey_date, date!(2026 - 01 - 05));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
