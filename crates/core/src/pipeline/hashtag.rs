use async_trait::async_trait;
use tokio::sync::OnceCell;

use super::listing::{ListingRequest, walk};
use super::{EntityInfo, Pipeline, RecordStream, resolve_by_label};
use crate::client::Client;
use crate::cursor::PageIndexed;
use crate::dispatch::{QueryParams, RequestOptions};
use crate::error::Result;
use crate::record::RecordFactory;

/// A hashtag, paged by 1-based page number.
#[derive(Debug)]
pub struct Hashtag {
	client: Client,
	label: String,
	info: OnceCell<EntityInfo>,
}

impl Hashtag {
	pub(crate) fn new(client: Client, label: impl Into<String>) -> Self {
		Self {
			client,
			label: label.into(),
			info: OnceCell::new(),
		}
	}

	/// Identifiers from a previous successful [`Pipeline::resolve_info`].
	pub fn cached_info(&self) -> Option<&EntityInfo> {
		self.info.get()
	}
}

#[async_trait]
impl Pipeline for Hashtag {
	type Info = EntityInfo;
	type Position = u32;

	fn label(&self) -> &str {
		&self.label
	}

	async fn resolve_info(&self, options: &RequestOptions) -> Result<EntityInfo> {
		self.info
			.get_or_try_init(|| async {
				let session = self.client.dispatcher().acquire(options)?;
				resolve_by_label(&self.client, &session, &self.label, options).await
			})
			.await
			.cloned()
	}

	/// Walks the challenge listing from page `page` (1-based) until `count`
	/// records were yielded or the service reports no more.
	fn videos<'a, F>(&'a self, info: &EntityInfo, count: usize, page: u32, options: &RequestOptions, factory: F) -> RecordStream<'a, F::Record>
	where
		F: RecordFactory + 'a,
	{
		let page_size = self.client.config().effective_page_size();
		let request = ListingRequest {
			url: self.client.config().endpoints.challenge_item_list.clone(),
			params: QueryParams::new()
				.with("challengeID", &info.internal_id)
				.with("count", page_size)
				.with_opt("msToken", options.ms_token.as_deref()),
			cursor_param: "cursor",
		};
		walk(self.client.clone(), request, PageIndexed::new(page_size, page), count, options.clone(), factory)
	}
}
