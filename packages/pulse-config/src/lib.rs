mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Gateway, Lifecycle, Postgres, Scheduler, Service, Storage, Twilio};

use std::{fs, path::Path};

pub const GATEWAY_MODE_MOCK: &str = "mock";
pub const GATEWAY_MODE_TWILIO: &str = "twilio";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.admin_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.base_url.trim().is_empty() {
		return Err(Error::Validation { message: "service.base_url must be non-empty.".to_string() });
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	if !matches!(cfg.gateway.mode.as_str(), GATEWAY_MODE_MOCK | GATEWAY_MODE_TWILIO) {
		return Err(Error::Validation {
			message: "gateway.mode must be one of mock or twilio.".to_string(),
		});
	}
	if cfg.gateway.mode == GATEWAY_MODE_TWILIO {
		let Some(twilio) = cfg.gateway.twilio.as_ref() else {
			return Err(Error::Validation {
				message: "gateway.twilio must be set when gateway.mode is twilio.".to_string(),
			});
		};

		for (label, value) in [
			("gateway.twilio.account_sid", &twilio.account_sid),
			("gateway.twilio.auth_token", &twilio.auth_token),
			("gateway.from_number", &cfg.gateway.from_number),
		] {
			if value.trim().is_empty() {
				return Err(Error::Validation { message: format!("{label} must be non-empty.") });
			}
		}
	}
	if cfg.gateway.max_attempts == 0 {
		return Err(Error::Validation {
			message: "gateway.max_attempts must be greater than zero.".to_string(),
		});
	}
	if cfg.gateway.base_backoff_ms <= 0 {
		return Err(Error::Validation {
			message: "gateway.base_backoff_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.gateway.max_backoff_ms < cfg.gateway.base_backoff_ms {
		return Err(Error::Validation {
			message: "gateway.max_backoff_ms must be at least gateway.base_backoff_ms.".to_string(),
		});
	}

	if cfg.scheduler.dispatch_hour > 23 {
		return Err(Error::Validation {
			message: "scheduler.dispatch_hour must be in the range 0-23.".to_string(),
		});
	}
	if cfg.scheduler.dispatch_minute > 59 {
		return Err(Error::Validation {
			message: "scheduler.dispatch_minute must be in the range 0-59.".to_string(),
		});
	}
	if cfg.scheduler.send_concurrency == 0 {
		return Err(Error::Validation {
			message: "scheduler.send_concurrency must be greater than zero.".to_string(),
		});
	}
	if cfg.scheduler.poll_interval_secs == 0 {
		return Err(Error::Validation {
			message: "scheduler.poll_interval_secs must be greater than zero.".to_string(),
		});
	}

	if cfg.lifecycle.pending_expiry_days <= 0 {
		return Err(Error::Validation {
			message: "lifecycle.pending_expiry_days must be greater than zero.".to_string(),
		});
	}
	if cfg.lifecycle.purge_delivery_after_days <= 0 {
		return Err(Error::Validation {
			message: "lifecycle.purge_delivery_after_days must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	while cfg.service.base_url.ends_with('/') {
		cfg.service.base_url.pop();
	}
	if cfg
		.gateway
		.twilio
		.as_ref()
		.map(|twilio| {
			twilio.account_sid.trim().is_empty() && twilio.auth_token.trim().is_empty()
		})
		.unwrap_or(false)
	{
		cfg.gateway.twilio = None;
	}
}
