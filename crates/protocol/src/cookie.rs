//! Cookie and session context file types.
//!
//! The browser-automation side exports its storage state (`cookies`
//! plus `origins`). Session context files extend that shape with the extra
//! request headers and query parameters the browser was observed sending.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cookie `SameSite` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
	Strict,
	Lax,
	None,
}

/// A browser cookie as exported in storage state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
	pub name: String,
	pub value: String,
	#[serde(default)]
	pub domain: String,
	#[serde(default = "default_path")]
	pub path: String,
	/// Unix timestamp in seconds; `-1` marks a session cookie.
	#[serde(default = "session_expiry")]
	pub expires: f64,
	#[serde(default)]
	pub http_only: bool,
	#[serde(default)]
	pub secure: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub same_site: Option<SameSite>,
}

fn default_path() -> String {
	"/".to_string()
}

fn session_expiry() -> f64 {
	-1.0
}

/// A `localStorage` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
	pub name: String,
	pub value: String,
}

/// Per-origin storage captured alongside cookies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginState {
	pub origin: String,
	#[serde(default)]
	pub local_storage: Vec<NameValue>,
}

/// Browser storage state export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageState {
	#[serde(default)]
	pub cookies: Vec<Cookie>,
	#[serde(default)]
	pub origins: Vec<OriginState>,
}

/// On-disk session context: storage state plus observed request context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContextFile {
	#[serde(flatten)]
	pub state: StorageState,
	/// Extra request headers, e.g. `user-agent` and `referer`.
	#[serde(default)]
	pub headers: BTreeMap<String, String>,
	/// Query parameters appended to every request, e.g. `device_id`.
	#[serde(default)]
	pub params: BTreeMap<String, String>,
}
