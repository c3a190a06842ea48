use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use pulse_domain::insights::{self, DailyScores, InsightsSummary};
use pulse_storage::queries;

use crate::{Error, Result, SurveyService, time_serde};

#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
	pub user_id: Uuid,
	pub name: String,
	pub phone_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignRef {
	pub campaign_id: Uuid,
	pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseView {
	pub response_id: Uuid,
	pub survey_date: Date,
	pub joy: i32,
	pub achievement: i32,
	pub meaningfulness: i32,
	pub influence_text: String,
	#[serde(with = "time_serde")]
	pub submitted_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
	pub user: UserRef,
	pub campaign: CampaignRef,
	/// Newest first, for display.
	pub responses: Vec<ResponseView>,
	pub analytics: InsightsSummary,
}

impl SurveyService {
	/// Aggregates the answered responses of one (user, campaign) pair.
	/// An empty history is a valid query and yields the zero summary.
	pub async fn compute_insights(
		&self,
		user_id: Uuid,
		campaign_id: Uuid,
	) -> Result<AnalyticsReport> {
		let user = queries::user_by_id(&self.db.pool, user_id).await?.ok_or_else(|| {
			Error::NotFound { message: format!("User {user_id} does not exist.") }
		})?;
		let campaign =
			queries::campaign_by_id(&self.db.pool, campaign_id).await?.ok_or_else(|| {
				Error::NotFound { message: format!("Campaign {campaign_id} does not exist.") }
			})?;
		let responses = queries::answered_responses(&self.db.pool, user_id, campaign_id).await?;
		let scores: Vec<DailyScores> = responses
			.iter()
			.map(|response| DailyScores {
				survey_date: response.survey_date,
				joy: response.joy as u8,
				achievement: response.achievement as u8,
				meaningfulness: response.meaningfulness as u8,
			})
			.collect();
		let analytics = insights::summarize(&scores);
		let mut views: Vec<ResponseView> = responses
			.into_iter()
			.map(|response| ResponseView {
				response_id: response.response_id,
				survey_date: response.survey_date,
				joy: response.joy,
				achievement: response.achievement,
				meaningfulness: response.meaningfulness,
				influence_text: response.influence_text,
				submitted_at: response.submitted_at,
			})
			.collect();

		views.reverse();

		Ok(AnalyticsReport {
			user: UserRef {
				user_id: user.user_id,
				name: user.name,
				phone_number: user.phone_number,
			},
			campaign: CampaignRef { campaign_id: campaign.campaign_id, name: campaign.name },
			responses: views,
			analytics,
		})
	}
}
