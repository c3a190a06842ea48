pub mod mock;
pub mod twilio;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use crate::{mock::MockSender, twilio::TwilioSender};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What the provider acknowledged for one accepted message.
#[derive(Debug, Clone)]
pub struct ProviderReceipt {
	pub provider_message_id: String,
}

/// The delivery capability. Callers hold `Arc<dyn Sender>` and cannot tell
/// which implementation is active.
pub trait Sender
where
	Self: Send + Sync,
{
	fn send<'a>(&'a self, to: &'a str, body: &'a str) -> BoxFuture<'a, Result<ProviderReceipt>>;
}

/// Resolves the configured implementation once at startup.
pub fn from_config(cfg: &pulse_config::Gateway) -> Result<Arc<dyn Sender>> {
	match cfg.mode.as_str() {
		pulse_config::GATEWAY_MODE_MOCK => Ok(Arc::new(MockSender::new())),
		pulse_config::GATEWAY_MODE_TWILIO => {
			let Some(twilio) = cfg.twilio.as_ref() else {
				return Err(Error::InvalidConfig {
					message: "Twilio credentials are not configured.".to_string(),
				});
			};

			Ok(Arc::new(TwilioSender::new(cfg, twilio)?))
		},
		other => Err(Error::InvalidConfig { message: format!("Unknown gateway mode: {other}.") }),
	}
}

pub fn backoff_for_attempt(attempt: u32, base_ms: i64, max_ms: i64) -> Duration {
	let exp = attempt.max(1).saturating_sub(1).min(6);
	let base = base_ms.saturating_mul(1 << exp);
	let capped = base.min(max_ms).max(0);

	Duration::from_millis(capped as u64)
}
