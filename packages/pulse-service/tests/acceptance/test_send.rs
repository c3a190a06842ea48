use pulse_service::TestSendRequest;
use pulse_storage::queries;

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn test_send_enrolls_the_test_fixtures_and_dispatches_once() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, mock) = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let report = service
		.send_test_message(TestSendRequest { phone: super::TEST_PHONE.to_string(), message: None })
		.await
		.expect("Test send failed.");

	assert!(report.sent);
	assert!(report.delivery_id.is_some());

	let user = queries::user_by_phone(&service.db.pool, super::TEST_PHONE)
		.await
		.expect("User lookup failed.")
		.expect("Expected the test user.");

	assert_eq!(user.name, "Test User");
	assert!(
		queries::campaign_by_name(&service.db.pool, "Test Campaign")
			.await
			.expect("Campaign lookup failed.")
			.is_some()
	);
	assert_eq!(mock.sent().len(), 1);

	// A second test send on the same day finds the existing instance.
	let repeat = service
		.send_test_message(TestSendRequest { phone: super::TEST_PHONE.to_string(), message: None })
		.await
		.expect("Repeat test send failed.");

	assert!(!repeat.sent);
	assert_eq!(mock.sent().len(), 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn test_send_with_a_custom_body_goes_straight_through() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, mock) = super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let report = service
		.send_test_message(TestSendRequest {
			phone: "+1 (555) 010-2030".to_string(),
			message: Some("Hello from the admin console.".to_string()),
		})
		.await
		.expect("Test send failed.");

	assert!(report.sent);
	assert_eq!(report.to, "+15550102030");

	let sent = mock.sent();

	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].body, "Hello from the admin console.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PULSE_PG_DSN to run."]
async fn test_send_rejects_a_malformed_phone_number() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping; set PULSE_PG_DSN to run this test.");

		return;
	};
	let (service, _mock) =
		super::build_service(super::test_config(test_db.dsn().to_string())).await;
	let result = service
		.send_test_message(TestSendRequest { phone: "not a number".to_string(), message: None })
		.await;

	assert!(result.is_err());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
