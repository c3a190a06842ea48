use std::sync::Arc;

use pulse_service::SurveyService;
use pulse_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SurveyService>,
}
impl AppState {
	pub async fn new(config: pulse_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let sender = pulse_gateway::from_config(&config.gateway)?;
		let service = SurveyService::new(config, db, sender);

		Ok(Self { service: Arc::new(service) })
	}
}
