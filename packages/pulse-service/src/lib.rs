pub mod admin;
pub mod dispatch;
pub mod inbound;
pub mod insights;
pub mod time_serde;

mod error;

pub use error::{Error, Result};

use std::sync::Arc;

use uuid::Uuid;

pub use admin::{TestSendReport, TestSendRequest};
pub use dispatch::CycleReport;
pub use inbound::InboundOutcome;
pub use insights::{AnalyticsReport, CampaignRef, ResponseView, UserRef};

use pulse_gateway::Sender;
use pulse_storage::db::Db;

pub struct SurveyService {
	pub cfg: pulse_config::Config,
	pub db: Db,
	pub sender: Arc<dyn Sender>,
}
impl SurveyService {
	pub fn new(cfg: pulse_config::Config, db: Db, sender: Arc<dyn Sender>) -> Self {
		Self { cfg, db, sender }
	}

	/// The personal insights link sent back after a recorded response.
	pub(crate) fn insights_url(&self, user_id: Uuid, campaign_id: Uuid) -> String {
		format!("{}/feedback/{user_id}/{campaign_id}", self.cfg.service.base_url)
	}
}
