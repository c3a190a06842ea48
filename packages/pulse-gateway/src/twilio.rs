use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{BoxFuture, Error, ProviderReceipt, Result, Sender};

/// Live sender backed by the Twilio Messages API.
pub struct TwilioSender {
	client: Client,
	api_base: String,
	account_sid: String,
	auth_token: String,
	from_number: String,
}
impl TwilioSender {
	pub fn new(gateway: &pulse_config::Gateway, twilio: &pulse_config::Twilio) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(gateway.timeout_ms)).build()?;

		Ok(Self {
			client,
			api_base: twilio.api_base.clone(),
			account_sid: twilio.account_sid.clone(),
			auth_token: twilio.auth_token.clone(),
			from_number: gateway.from_number.clone(),
		})
	}

	async fn send_message(&self, to: &str, body: &str) -> Result<ProviderReceipt> {
		let url =
			format!("{}/2010-04-01/Accounts/{}/Messages.json", self.api_base, self.account_sid);
		let params = [("To", to), ("From", self.from_number.as_str()), ("Body", body)];
		let res = self
			.client
			.post(url)
			.basic_auth(&self.account_sid, Some(&self.auth_token))
			.form(&params)
			.send()
			.await?;
		let status = res.status();

		if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
			return Err(Error::Unavailable { message: format!("Provider returned {status}.") });
		}
		if !status.is_success() {
			let detail = res.text().await.unwrap_or_default();

			return Err(Error::Rejected { message: format!("Provider returned {status}: {detail}") });
		}

		let json: Value = res.json().await?;

		parse_message_response(json)
	}
}
impl Sender for TwilioSender {
	fn send<'a>(&'a self, to: &'a str, body: &'a str) -> BoxFuture<'a, Result<ProviderReceipt>> {
		Box::pin(self.send_message(to, body))
	}
}

fn parse_message_response(json: Value) -> Result<ProviderReceipt> {
	let sid = json.get("sid").and_then(|v| v.as_str()).ok_or_else(|| Error::InvalidResponse {
		message: "Message response is missing sid.".to_string(),
	})?;

	Ok(ProviderReceipt { provider_message_id: sid.to_string() })
}
