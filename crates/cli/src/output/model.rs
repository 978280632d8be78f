use serde::{Deserialize, Serialize};

/// Current schema version for command output.
pub const SCHEMA_VERSION: u32 = 1;

/// The result envelope returned by all commands.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schema_version: Option<u32>,
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub inputs: Option<serde_json::Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub duration_ms: Option<u64>,
}

/// Error information for failed commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
}

/// Standardized error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	TransportFailure,
	InvalidResponse,
	ResolutionFailed,
	SessionError,
	ConfigError,
	InvalidInput,
	IoError,
	ServerError,
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorCode::TransportFailure => write!(f, "TRANSPORT_FAILURE"),
			ErrorCode::InvalidResponse => write!(f, "INVALID_RESPONSE"),
			ErrorCode::ResolutionFailed => write!(f, "RESOLUTION_FAILED"),
			ErrorCode::SessionError => write!(f, "SESSION_ERROR"),
			ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
			ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
			ErrorCode::IoError => write!(f, "IO_ERROR"),
			ErrorCode::ServerError => write!(f, "SERVER_ERROR"),
			ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
		}
	}
}

/// Payload of the listing commands.
///
/// With streamed output the records have already been written, so `videos`
/// is omitted and only `total` remains.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingData<I: Serialize, R: Serialize> {
	pub info: Option<I>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub videos: Option<Vec<R>>,
	pub total: usize,
}
