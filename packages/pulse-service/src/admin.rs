use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use pulse_domain::{phone, template};
use pulse_storage::{
	models::{Campaign, User},
	queries,
};

use crate::{Error, Result, SurveyService, dispatch};

const TEST_USER_NAME: &str = "Test User";
const TEST_CAMPAIGN_NAME: &str = "Test Campaign";
const TEST_CAMPAIGN_DAYS: i64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct TestSendRequest {
	pub phone: String,
	pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestSendReport {
	pub to: String,
	pub sent: bool,
	pub delivery_id: Option<Uuid>,
}

impl SurveyService {
	/// Sends a test message to a phone number. A custom body goes straight
	/// through the gateway; without one, the test user and a 30-day test
	/// campaign are created as needed and a real survey instance is
	/// dispatched, so the whole reply path can be exercised end to end.
	pub async fn send_test_message(&self, req: TestSendRequest) -> Result<TestSendReport> {
		let to = phone::canonicalize(&req.phone)
			.map_err(|err| Error::InvalidRequest { message: err.to_string() })?;

		if let Some(message) = req.message.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
			let delivery_id = dispatch::deliver(
				&self.db.pool,
				self.sender.as_ref(),
				&self.cfg.gateway,
				&to,
				"test",
				message,
				None,
			)
			.await?;

			return Ok(TestSendReport { to, sent: true, delivery_id: Some(delivery_id) });
		}

		let now = OffsetDateTime::now_utc();
		let today = now.date();
		let user = self.get_or_create_test_user(&to, now).await?;
		let campaign = self.get_or_create_test_campaign(now).await?;
		let instance_id = Uuid::new_v4();
		let created = queries::create_survey_instance(
			&self.db.pool,
			instance_id,
			user.user_id,
			campaign.campaign_id,
			today,
		)
		.await?;

		if !created {
			// Today's test survey was already dispatched.
			return Ok(TestSendReport { to, sent: false, delivery_id: None });
		}

		let body = template::survey_message(&user.name, today);
		let delivery_id = dispatch::deliver(
			&self.db.pool,
			self.sender.as_ref(),
			&self.cfg.gateway,
			&to,
			"survey",
			&body,
			Some(instance_id),
		)
		.await?;

		Ok(TestSendReport { to, sent: true, delivery_id: Some(delivery_id) })
	}

	async fn get_or_create_test_user(&self, phone: &str, now: OffsetDateTime) -> Result<User> {
		if let Some(user) = queries::user_by_phone(&self.db.pool, phone).await? {
			return Ok(user);
		}

		let user = User {
			user_id: Uuid::new_v4(),
			name: TEST_USER_NAME.to_string(),
			phone_number: phone.to_string(),
			is_active: true,
			created_at: now,
		};

		queries::insert_user(&self.db.pool, &user).await?;

		Ok(user)
	}

	async fn get_or_create_test_campaign(&self, now: OffsetDateTime) -> Result<Campaign> {
		if let Some(campaign) =
			queries::campaign_by_name(&self.db.pool, TEST_CAMPAIGN_NAME).await?
		{
			return Ok(campaign);
		}

		let today = now.date();
		let campaign = Campaign {
			campaign_id: Uuid::new_v4(),
			name: TEST_CAMPAIGN_NAME.to_string(),
			description: None,
			start_date: today,
			end_date: today + Duration::days(TEST_CAMPAIGN_DAYS),
			is_active: true,
			created_at: now,
		};

		queries::insert_campaign(&self.db.pool, &campaign).await?;

		Ok(campaign)
	}
}
