use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub gateway: Gateway,
	pub scheduler: Scheduler,
	pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
	/// Public base URL used when building the insights link sent back to
	/// participants, e.g. "https://pulse.example.org".
	pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Gateway {
	/// "mock" or "twilio". Resolved once at startup; call sites never branch
	/// on it.
	pub mode: String,
	pub from_number: String,
	pub timeout_ms: u64,
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
	#[serde(default = "default_base_backoff_ms")]
	pub base_backoff_ms: i64,
	#[serde(default = "default_max_backoff_ms")]
	pub max_backoff_ms: i64,
	pub twilio: Option<Twilio>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Twilio {
	#[serde(default = "default_twilio_api_base")]
	pub api_base: String,
	pub account_sid: String,
	pub auth_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scheduler {
	pub dispatch_hour: u8,
	pub dispatch_minute: u8,
	#[serde(default = "default_send_concurrency")]
	pub send_concurrency: u32,
	#[serde(default = "default_poll_interval_secs")]
	pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Lifecycle {
	/// Days a survey instance may stay `pending` before the sweep expires it.
	pub pending_expiry_days: i64,
	/// Days delivery records are retained before being purged.
	pub purge_delivery_after_days: i64,
}

fn default_max_attempts() -> u32 {
	3
}

fn default_base_backoff_ms() -> i64 {
	500
}

fn default_max_backoff_ms() -> i64 {
	30_000
}

fn default_twilio_api_base() -> String {
	"https://api.twilio.com".to_string()
}

fn default_send_concurrency() -> u32 {
	4
}

fn default_poll_interval_secs() -> u64 {
	30
}
