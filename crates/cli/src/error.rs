use std::path::PathBuf;

use feedwalk::ErrorKind;
use thiserror::Error;

use crate::output::ErrorCode;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Core(#[from] feedwalk::Error),

	#[error("config {}: {message}", path.display())]
	Config { path: PathBuf, message: String },

	#[error("no sessions configured; pass --session FILE or list session files under \"sessions\" in the config")]
	NoSessions,

	#[error("HTTP client setup failed: {0}")]
	HttpClient(String),

	#[error("server error: {0}")]
	Server(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl CliError {
	pub(crate) fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
		Self::Config {
			path: path.into(),
			message: message.into(),
		}
	}

	/// Stable code reported in result envelopes and HTTP error bodies.
	pub fn code(&self) -> ErrorCode {
		match self {
			CliError::Core(err) => match err.kind() {
				ErrorKind::TransportFailure => ErrorCode::TransportFailure,
				ErrorKind::InvalidResponse => ErrorCode::InvalidResponse,
				ErrorKind::Resolution => ErrorCode::ResolutionFailed,
				ErrorKind::PoolIndex => ErrorCode::InvalidInput,
				ErrorKind::SessionFile => ErrorCode::SessionError,
			},
			CliError::Config { .. } | CliError::NoSessions => ErrorCode::ConfigError,
			CliError::HttpClient(_) => ErrorCode::InternalError,
			CliError::Server(_) => ErrorCode::ServerError,
			CliError::Io(_) => ErrorCode::IoError,
			CliError::Json(_) => ErrorCode::InternalError,
		}
	}
}
