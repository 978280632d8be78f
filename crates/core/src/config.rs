//! Client configuration: endpoint URLs and pagination constants.
//!
//! Every field is defaulted so a partial JSON object (or `{}`) deserializes
//! into a working configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_BASE: &str = "https://www.tiktok.com";

/// Default number of records requested per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Endpoint URLs for every request the pipelines issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Endpoints {
	/// Label → internal id lookup.
	pub challenge_detail: String,
	/// Item listing keyed by internal id.
	pub challenge_item_list: String,
	/// Item listing keyed by place secondary id.
	pub place_item_list: String,
	/// Search listing keyed by keyword and derived ids.
	pub search_item_list: String,
	/// HTML search page scanned for the origin id.
	pub search_page: String,
}

impl Endpoints {
	/// Builds the endpoint set rooted at `base` (no trailing slash needed).
	pub fn with_base(base: &str) -> Self {
		let base = base.trim_end_matches('/');
		Self {
			challenge_detail: format!("{base}/api/challenge/detail/"),
			challenge_item_list: format!("{base}/api/challenge/item_list/"),
			place_item_list: format!("{base}/api/poi/item_list/"),
			search_item_list: format!("{base}/api/search/item/full/"),
			search_page: format!("{base}/search/video"),
		}
	}
}

impl Default for Endpoints {
	fn default() -> Self {
		Self::with_base(DEFAULT_BASE)
	}
}

/// The single fixed-offset probe the place pipeline issues to find a
/// secondary id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProbeConfig {
	pub count: u32,
	pub cursor: u64,
}

impl Default for ProbeConfig {
	fn default() -> Self {
		Self { count: 5, cursor: 30 }
	}
}

/// Configuration shared by every pipeline created from a [`crate::Client`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
	pub endpoints: Endpoints,
	/// Records requested per listing page; also the page-indexed stride.
	pub page_size: u32,
	pub probe: ProbeConfig,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			endpoints: Endpoints::default(),
			page_size: DEFAULT_PAGE_SIZE,
			probe: ProbeConfig::default(),
		}
	}
}

impl ClientConfig {
	/// Page size clamped to at least one record.
	pub fn effective_page_size(&self) -> u32 {
		self.page_size.max(1)
	}
}
