pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Delivery failed: {message}")]
	Delivery { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
impl From<pulse_storage::Error> for Error {
	fn from(err: pulse_storage::Error) -> Self {
		match err {
			pulse_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			pulse_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			pulse_storage::Error::NotFound(message) => Self::NotFound { message },
			pulse_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}
impl From<pulse_gateway::Error> for Error {
	fn from(err: pulse_gateway::Error) -> Self {
		Self::Delivery { message: err.to_string() }
	}
}
