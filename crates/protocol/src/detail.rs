//! Detail payloads used to resolve labels into identifiers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de::flex_id;

/// Response of the challenge detail endpoint.
///
/// The current schema nests the challenge under `challengeInfo`; older
/// responses (and records embedded in listings) carry `id`/`title` at the
/// top level. Both forms are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDetail {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub challenge_info: Option<ChallengeInfo>,
	#[serde(default, deserialize_with = "flex_id", skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
}

impl ChallengeDetail {
	/// Returns `(id, title)` from whichever form the payload uses.
	pub fn identity(&self) -> Option<(&str, Option<&str>)> {
		if let Some(challenge) = self.challenge_info.as_ref().and_then(|info| info.challenge.as_ref()) {
			if let Some(id) = challenge.id.as_deref() {
				return Some((id, challenge.title.as_deref()));
			}
		}
		self.id.as_deref().map(|id| (id, self.title.as_deref()))
	}
}

/// The `challengeInfo` envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeInfo {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub challenge: Option<Challenge>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stats: Option<Value>,
}

/// A challenge (hashtag) as described by the detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
	#[serde(default, deserialize_with = "flex_id", skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub split_title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub desc: Option<String>,
}

/// The `poi` object embedded in listing records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiRef {
	#[serde(default, deserialize_with = "flex_id", skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}
