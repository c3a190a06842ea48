pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error("Provider unavailable: {message}")]
	Unavailable { message: String },
	#[error("Provider rejected the message: {message}")]
	Rejected { message: String },
}
impl Error {
	/// Transient failures are worth retrying; permanent ones are not.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::Reqwest(_) | Self::Unavailable { .. })
	}
}
