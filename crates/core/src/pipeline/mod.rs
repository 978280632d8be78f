//! Resolution pipelines: label → identifiers → lazy record stream.
//!
//! All three pipelines share [`resolve_by_label`] (or, for search, derive
//! their identifiers from other pages) and then hand a cursor policy to the
//! shared listing walker. Resolution produces an immutable info value which
//! the caller passes back into `videos`; an entity memoizes it so repeated
//! `resolve_info` calls never dispatch twice.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::Serialize;
use serde_json::Value;

use crate::dispatch::RequestOptions;
use crate::error::Result;
use crate::record::RecordFactory;

mod hashtag;
mod listing;
mod place;
mod resolve;
mod search;

pub use hashtag::Hashtag;
pub use place::{Place, first_secondary_id};
pub use resolve::{LabelLookup, LabelTable, normalize_label};
pub use search::{Search, SearchInfo, extract_origin_id, web_search_code};

pub(crate) use resolve::resolve_by_label;

/// Lazily produced, non-restartable sequence of records.
///
/// Each page is fetched only once the consumer has drained the previous
/// one. Dropping the stream abandons the traversal.
pub type RecordStream<'a, R> = Pin<Box<dyn Stream<Item = Result<R>> + Send + 'a>>;

/// Identifiers resolved for a label-keyed entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityInfo {
	/// Label as confirmed by the service (or as supplied, for table hits).
	pub label: String,
	pub internal_id: String,
	/// Only set for places.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub secondary_id: Option<String>,
	/// Detail payload the id was read from; absent for table hits.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub raw: Option<Value>,
}

/// Capability shared by the hashtag, place and search pipelines.
#[async_trait]
pub trait Pipeline: Send + Sync {
	/// Resolved identifiers required before pagination.
	type Info: Clone + Send + Sync + Serialize;
	/// Where a traversal starts: page number, cursor or offset.
	type Position: Send;

	/// The label this entity was created for.
	fn label(&self) -> &str;

	/// Resolves (once) and returns the identifiers for this entity.
	async fn resolve_info(&self, options: &RequestOptions) -> Result<Self::Info>;

	/// Streams at most `count` records starting at `from`.
	fn videos<'a, F>(&'a self, info: &Self::Info, count: usize, from: Self::Position, options: &RequestOptions, factory: F) -> RecordStream<'a, F::Record>
	where
		F: RecordFactory + 'a;
}
