//! Service-level status envelope shared by every JSON endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::de::code_value;

/// Status fields the service embeds in otherwise successful HTTP responses.
///
/// A non-zero code means the service rejected the request even though the
/// transport succeeded. Endpoints spell the fields `statusCode`/`statusMsg`
/// or `status_code`/`status_msg`, and send the code as a number or a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusEnvelope {
	#[serde(rename = "statusCode")]
	pub status_code: i64,
	#[serde(rename = "statusMsg", skip_serializing_if = "Option::is_none")]
	pub status_msg: Option<String>,
}

impl StatusEnvelope {
	/// Reads the status out of a decoded payload. The camelCase spelling wins
	/// when both are present.
	pub fn from_payload(payload: &Value) -> Self {
		let field = |camel: &str, snake: &str| payload.get(camel).filter(|v| !v.is_null()).or_else(|| payload.get(snake));
		Self {
			status_code: field("statusCode", "status_code").map_or(0, code_value),
			status_msg: field("statusMsg", "status_msg").and_then(Value::as_str).map(str::to_string),
		}
	}

	/// Returns `true` when the service reported success.
	pub fn is_ok(&self) -> bool {
		self.status_code == 0
	}
}

impl<'de> Deserialize<'de> for StatusEnvelope {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(Self::from_payload(&Value::deserialize(deserializer)?))
	}
}
