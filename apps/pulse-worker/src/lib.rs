pub mod worker;

use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
	version = pulse_cli::VERSION,
	rename_all = "kebab",
	styles = pulse_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = pulse_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = pulse_storage::db::Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let sender = pulse_gateway::from_config(&config.gateway)?;
	let service = Arc::new(pulse_service::SurveyService::new(config, db, sender));
	let (shutdown_tx, shutdown_rx) = watch::channel(false);

	tokio::spawn(async move {
		let _ = tokio::signal::ctrl_c().await;

		tracing::info!("Shutdown signal received.");

		let _ = shutdown_tx.send(true);
	});

	worker::run_worker(worker::WorkerState { service, shutdown: shutdown_rx }).await
}
