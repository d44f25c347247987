use thiserror::Error;

/// Errors raised while talking to a data source.
#[derive(Debug, Error)]
pub enum SourceError {
	/// The service answered with a non-success status.
	#[error("HTTP {status}: {body}")]
	Status {
		/// Response status code.
		status: u16,
		/// Response body, possibly empty.
		body: String,
	},

	/// Connection, timeout or body decoding failure.
	#[error("transport error: {0}")]
	Transport(#[from] reqwest::Error),

	/// The configured base URL cannot carry path segments.
	#[error("invalid base url: {0}")]
	InvalidBaseUrl(String),

	/// The requested record does not exist.
	#[error("not found: {0}")]
	NotFound(String),

	/// The source is unavailable for a reason other than HTTP.
	#[error("unavailable: {0}")]
	Unavailable(String),
}

impl SourceError {
	/// Returns true for failures that a later retry could plausibly fix.
	pub fn is_transient(&self) -> bool {
		match self {
			Self::Status { status, .. } => *status == 429 || *status >= 500,
			Self::Transport(_) | Self::Unavailable(_) => true,
			Self::InvalidBaseUrl(_) | Self::NotFound(_) => false,
		}
	}
}

/// Result type for data-source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
