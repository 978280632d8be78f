//! Item listing pages returned by the challenge, place and search endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cursor::Cursor;
use crate::de::{flex_bool, null_as_empty, or_none};

/// One page of an item listing.
///
/// The challenge and place endpoints answer with `itemList`/`hasMore`, the
/// search endpoint with `item_list`/`has_more`; both spellings are accepted.
/// Items are kept raw: their schema is owned by whoever builds records.
/// `cursor` and `extra` read as `None` when malformed, so a bad value there
/// never costs the page its items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemListPage {
	#[serde(rename = "itemList", alias = "item_list", default, deserialize_with = "null_as_empty")]
	pub items: Vec<Value>,
	#[serde(default, deserialize_with = "or_none", skip_serializing_if = "Option::is_none")]
	pub cursor: Option<Cursor>,
	#[serde(rename = "hasMore", alias = "has_more", default, deserialize_with = "flex_bool")]
	pub has_more: bool,
	#[serde(default, deserialize_with = "or_none", skip_serializing_if = "Option::is_none")]
	pub extra: Option<ResponseExtra>,
}

impl ItemListPage {
	/// Returns the server cursor with decimal tokens folded into offsets.
	pub fn next_cursor(&self) -> Option<Cursor> {
		self.cursor.clone().map(Cursor::normalized)
	}

	/// Takes the raw items out of a listing payload without decoding any other
	/// field. Absent, `null` or non-array items read as empty.
	pub fn items_of(payload: Value) -> Vec<Value> {
		let Value::Object(mut map) = payload else {
			return Vec::new();
		};
		match map.remove("itemList").or_else(|| map.remove("item_list")) {
			Some(Value::Array(items)) => items,
			_ => Vec::new(),
		}
	}

	/// Returns the `extra.logid` echoed by the service, if any.
	pub fn log_id(&self) -> Option<&str> {
		self.extra.as_ref().and_then(|extra| extra.logid.as_deref()).filter(|id| !id.is_empty())
	}
}

/// Request metadata echoed back by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseExtra {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub logid: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub now: Option<i64>,
}
