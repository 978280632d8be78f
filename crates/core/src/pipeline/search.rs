//! Keyword search.
//!
//! Search has no label → id endpoint. Two identifiers are derived instead:
//! the origin id embedded in the search page's rehydration blob, and the
//! search id the listing endpoint echoes back as `extra.logid`. Both are
//! cached on the entity after the first successful resolution.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use super::listing::{ListingRequest, decode_page, walk};
use super::{Pipeline, RecordStream};
use crate::client::Client;
use crate::cursor::SinglePage;
use crate::dispatch::{QueryParams, RequestOptions};
use crate::error::{ResolutionError, Result};
use crate::record::RecordFactory;

static REHYDRATION_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?s)<script[^>]*\bid="__UNIVERSAL_DATA_FOR_REHYDRATION__"[^>]*>(.*?)</script>"#).expect("valid rehydration regex")
});

const ORIGIN_ID_POINTER: &str = "/__DEFAULT_SCOPE__/webapp.app-context/odinId";

/// Identifiers a search listing call needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInfo {
	pub keyword: String,
	pub origin_id: String,
	pub search_id: String,
}

/// A keyword search, addressed by result offset.
#[derive(Debug)]
pub struct Search {
	client: Client,
	keyword: String,
	info: OnceCell<SearchInfo>,
}

impl Search {
	pub(crate) fn new(client: Client, keyword: impl Into<String>) -> Self {
		Self {
			client,
			keyword: keyword.into(),
			info: OnceCell::new(),
		}
	}

	pub fn cached_info(&self) -> Option<&SearchInfo> {
		self.info.get()
	}

	async fn resolve_uncached(&self, options: &RequestOptions) -> Result<SearchInfo> {
		let keyword = self.keyword.trim();
		if keyword.is_empty() {
			return Err(ResolutionError::EmptyLabel.into());
		}

		let session = self.client.dispatcher().acquire(options)?;
		let endpoints = &self.client.config().endpoints;

		let page_url = endpoints.search_page.as_str();
		let html = self
			.client
			.dispatcher()
			.fetch_text(page_url, &QueryParams::new().with("q", keyword), &session, options.headers.as_ref())
			.await?;
		let origin_id = extract_origin_id(&html).ok_or_else(|| ResolutionError::OriginIdNotFound {
			keyword: keyword.to_string(),
			url: page_url.to_string(),
		})?;

		let listing_url = endpoints.search_item_list.as_str();
		let params = listing_params(keyword, 0, &origin_id).with_opt("msToken", options.ms_token.as_deref());
		let payload = self.client.dispatcher().dispatch(listing_url, &params, &session, options.headers.as_ref()).await?;
		let page = decode_page(listing_url, payload)?;
		let search_id = page.log_id().filter(|id| !id.is_empty()).map(str::to_owned).ok_or_else(|| ResolutionError::SearchIdNotFound {
			keyword: keyword.to_string(),
			url: listing_url.to_string(),
		})?;

		debug!(target = "feedwalk::pipeline", %keyword, %origin_id, %search_id, session = session.index(), "search resolved");
		Ok(SearchInfo {
			keyword: keyword.to_string(),
			origin_id,
			search_id,
		})
	}
}

fn listing_params(keyword: &str, offset: u64, origin_id: &str) -> QueryParams {
	QueryParams::new()
		.with("keyword", keyword)
		.with("offset", offset)
		.with("web_search_code", web_search_code(keyword))
		.with("odinId", origin_id)
}

/// Reads the origin id from the search page's rehydration script.
pub fn extract_origin_id(html: &str) -> Option<String> {
	let script = REHYDRATION_SCRIPT.captures(html)?.get(1)?.as_str().trim();
	let data: Value = serde_json::from_str(script).ok()?;
	match data.pointer(ORIGIN_ID_POINTER)? {
		Value::String(id) if !id.is_empty() => Some(id.clone()),
		Value::Number(id) => Some(id.to_string()),
		_ => None,
	}
}

/// Percent-encoded search engine settings sent with every listing call.
///
/// Keys keep the order the web client sends them in.
pub fn web_search_code(keyword: &str) -> String {
	let keyword = Value::String(keyword.to_string());
	let code = format!(
		r#"{{"tiktok":{{"client_params_x":{{"search_engine":{{"ies_mt_user_live_video_card_use_libra":1,"mt_search_general_user_live_card":1,"keyword":{keyword}}}}},"search_server":{{}}}}}}"#
	);
	urlencoding::encode(&code).into_owned()
}

#[async_trait]
impl Pipeline for Search {
	type Info = SearchInfo;
	type Position = u64;

	fn label(&self) -> &str {
		&self.keyword
	}

	async fn resolve_info(&self, options: &RequestOptions) -> Result<SearchInfo> {
		self.info.get_or_try_init(|| self.resolve_uncached(options)).await.cloned()
	}

	/// One listing call at `offset`, yielding at most `count` records.
	fn videos<'a, F>(&'a self, info: &SearchInfo, count: usize, offset: u64, options: &RequestOptions, factory: F) -> RecordStream<'a, F::Record>
	where
		F: RecordFactory + 'a,
	{
		let request = ListingRequest {
			url: self.client.config().endpoints.search_item_list.clone(),
			params: listing_params(&info.keyword, offset, &info.origin_id)
				.with("search_id", &info.search_id)
				.with_opt("msToken", options.ms_token.as_deref()),
			cursor_param: "offset",
		};
		walk(self.client.clone(), request, SinglePage::new(offset), count, options.clone(), factory)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn origin_id_is_read_from_rehydration_blob() {
		let html = r#"<html><head><script id="__UNIVERSAL_DATA_FOR_REHYDRATION__" type="application/json">
			{"__DEFAULT_SCOPE__":{"webapp.app-context":{"odinId":"7421","region":"US"}}}
		</script></head></html>"#;
		assert_eq!(extract_origin_id(html), Some("7421".to_string()));
	}

	#[test]
	fn attribute_order_does_not_matter() {
		let html = r#"<script type="application/json" id="__UNIVERSAL_DATA_FOR_REHYDRATION__">{"__DEFAULT_SCOPE__":{"webapp.app-context":{"odinId":99}}}</script>"#;
		assert_eq!(extract_origin_id(html), Some("99".to_string()));
	}

	#[test]
	fn missing_blob_or_field_yields_none() {
		assert_eq!(extract_origin_id("<html></html>"), None);
		let html = r#"<script id="__UNIVERSAL_DATA_FOR_REHYDRATION__" type="application/json">{"__DEFAULT_SCOPE__":{}}</script>"#;
		assert_eq!(extract_origin_id(html), None);
		let broken = r#"<script id="__UNIVERSAL_DATA_FOR_REHYDRATION__" type="application/json">{not json</script>"#;
		assert_eq!(extract_origin_id(broken), None);
	}

	#[test]
	fn web_search_code_embeds_keyword() {
		let code = web_search_code("cats \"and\" dogs");
		let decoded = urlencoding::decode(&code).unwrap();
		let value: Value = serde_json::from_str(&decoded).unwrap();
		assert_eq!(value["tiktok"]["client_params_x"]["search_engine"]["keyword"], "cats \"and\" dogs");
		assert_eq!(value["tiktok"]["client_params_x"]["search_engine"]["mt_search_general_user_live_card"], 1);
		assert!(decoded.starts_with(r#"{"tiktok":{"client_params_x":{"search_engine":{"ies_mt_user_live_video_card_use_libra":1"#));
		assert!(!code.contains('"'));
	}
}
