use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pulse_service::{
	AnalyticsReport, Error as ServiceError, InboundOutcome, TestSendReport, TestSendRequest,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/webhook/sms", post(inbound_sms))
		.route("/v1/analytics/{user_id}/{campaign_id}", get(analytics))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/v1/admin/test-send", post(test_send)).with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

/// The provider's callback shape: form-encoded `From`/`Body`/`MessageSid`.
#[derive(Debug, Deserialize)]
pub struct SmsWebhook {
	#[serde(rename = "From")]
	pub from: String,
	#[serde(rename = "Body", default)]
	pub body: String,
	#[serde(rename = "MessageSid")]
	pub message_sid: String,
}

async fn inbound_sms(
	State(state): State<AppState>,
	Form(payload): Form<SmsWebhook>,
) -> Result<Json<InboundOutcome>, ApiError> {
	// Every interpreter outcome is terminal; a non-2xx here would only make
	// the provider redeliver.
	let outcome = state
		.service
		.handle_inbound_message(&payload.from, &payload.body, &payload.message_sid)
		.await?;

	Ok(Json(outcome))
}

async fn analytics(
	State(state): State<AppState>,
	Path((user_id, campaign_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AnalyticsReport>, ApiError> {
	let report = state.service.compute_insights(user_id, campaign_id).await?;

	Ok(Json(report))
}

async fn test_send(
	State(state): State<AppState>,
	Json(payload): Json<TestSendRequest>,
) -> Result<Json<TestSendReport>, ApiError> {
	let report = state.service.send_test_message(payload).await?;

	Ok(Json(report))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match &err {
			ServiceError::InvalidRequest { .. } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", err.to_string()),
			ServiceError::NotFound { .. } =>
				json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
			ServiceError::Conflict { .. } =>
				json_error(StatusCode::CONFLICT, "conflict", err.to_string()),
			ServiceError::Delivery { .. } =>
				json_error(StatusCode::BAD_GATEWAY, "delivery_failed", err.to_string()),
			ServiceError::Storage { .. } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", err.to_string()),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
