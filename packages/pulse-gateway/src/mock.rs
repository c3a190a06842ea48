use std::sync::{
	Mutex,
	atomic::{AtomicU64, Ordering},
};

use crate::{BoxFuture, ProviderReceipt, Result, Sender};

#[derive(Debug, Clone)]
pub struct SentMessage {
	pub to: String,
	pub body: String,
	pub provider_message_id: String,
}

/// Deterministic sender for cost-free end-to-end testing: always succeeds,
/// records every message in-process, no network egress.
#[derive(Debug, Default)]
pub struct MockSender {
	counter: AtomicU64,
	sent: Mutex<Vec<SentMessage>>,
}
impl MockSender {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn sent(&self) -> Vec<SentMessage> {
		self.sent.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl Sender for MockSender {
	fn send<'a>(&'a self, to: &'a str, body: &'a str) -> BoxFuture<'a, Result<ProviderReceipt>> {
		Box::pin(async move {
			let sequence = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
			let provider_message_id = format!("mock-{sequence}");
			let preview: String = body.chars().take(50).collect();

			tracing::info!(%to, id = %provider_message_id, %preview, "Mock SMS recorded.");
			self.sent.lock().unwrap_or_else(|err| err.into_inner()).push(SentMessage {
				to: to.to_string(),
				body: body.to_string(),
				provider_message_id: provider_message_id.clone(),
			});

			Ok(ProviderReceipt { provider_message_id })
		})
	}
}
