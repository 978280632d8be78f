//! Shared listing walker.

use async_stream::try_stream;
use feedwalk_protocol::ItemListPage;
use serde_json::Value;
use tracing::debug;

use super::RecordStream;
use crate::client::Client;
use crate::cursor::{CursorPolicy, PageSummary};
use crate::dispatch::{QueryParams, RequestOptions};
use crate::error::{Error, Result};
use crate::record::RecordFactory;

/// One listing endpoint plus the fixed parameters of a traversal.
#[derive(Debug, Clone)]
pub(crate) struct ListingRequest {
	pub url: String,
	pub params: QueryParams,
	/// Name of the parameter the cursor is sent as.
	pub cursor_param: &'static str,
}

/// Decodes a listing payload.
pub(crate) fn decode_page(url: &str, payload: Value) -> Result<ItemListPage> {
	serde_json::from_value(payload).map_err(|e| Error::invalid(url, format!("unexpected listing shape: {e}")))
}

/// Walks `request` under `policy`, yielding at most `limit` records.
///
/// The session is acquired on first poll and pinned for the whole
/// traversal. A failure is yielded once and ends the stream; records already
/// yielded stay with the consumer.
pub(crate) fn walk<'a, P, F>(client: Client, request: ListingRequest, policy: P, limit: usize, options: RequestOptions, factory: F) -> RecordStream<'a, F::Record>
where
	P: CursorPolicy + 'a,
	F: RecordFactory + 'a,
{
	Box::pin(try_stream! {
		let mut state = policy.initial();
		if limit > 0 {
			let session = client.dispatcher().acquire(&options)?;
			let mut yielded = 0usize;
			while state.has_more && yielded < limit {
				let mut params = request.params.clone();
				params.insert(request.cursor_param, &state.cursor);
				let payload = client.dispatcher().dispatch(&request.url, &params, &session, options.headers.as_ref()).await?;
				let page = decode_page(&request.url, payload)?;
				let summary = PageSummary::from(&page);
				debug!(
					target = "feedwalk::pipeline",
					url = %request.url,
					cursor = %state.cursor,
					records = summary.records,
					has_more = summary.has_more,
					session = session.index(),
					"page received"
				);

				for raw in page.items {
					if yielded == limit {
						break;
					}
					yielded += 1;
					yield factory.build(raw);
				}
				state = policy.advance(&state, &summary);
			}
			debug!(target = "feedwalk::pipeline", url = %request.url, yielded, fetched = state.fetched, "traversal finished");
		}
	})
}
