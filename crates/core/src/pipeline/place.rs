use async_trait::async_trait;
use feedwalk_protocol::{Cursor, ItemListPage, PoiRef};
use futures::stream;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use super::listing::{ListingRequest, walk};
use super::{EntityInfo, Pipeline, RecordStream, resolve_by_label};
use crate::client::Client;
use crate::cursor::ServerDriven;
use crate::dispatch::{QueryParams, RequestOptions};
use crate::error::{Error, ResolutionError, Result};
use crate::record::RecordFactory;

/// A place, resolved through its hashtag and paged by server cursor.
///
/// The place id is not exposed by any lookup endpoint. It is discovered by
/// probing the hashtag's listing and reading the place tag of the first
/// record that carries one. Only the probe's items are read.
#[derive(Debug)]
pub struct Place {
	client: Client,
	label: String,
	info: OnceCell<EntityInfo>,
}

impl Place {
	pub(crate) fn new(client: Client, label: impl Into<String>) -> Self {
		Self {
			client,
			label: label.into(),
			info: OnceCell::new(),
		}
	}

	pub fn cached_info(&self) -> Option<&EntityInfo> {
		self.info.get()
	}

	async fn resolve_uncached(&self, options: &RequestOptions) -> Result<EntityInfo> {
		let session = self.client.dispatcher().acquire(options)?;
		let info = resolve_by_label(&self.client, &session, &self.label, options).await?;

		let config = self.client.config();
		let url = config.endpoints.challenge_item_list.as_str();
		let params = QueryParams::new()
			.with("challengeID", &info.internal_id)
			.with("count", config.probe.count)
			.with("cursor", config.probe.cursor)
			.with_opt("msToken", options.ms_token.as_deref());
		let payload = self.client.dispatcher().dispatch(url, &params, &session, options.headers.as_ref()).await?;
		let items = ItemListPage::items_of(payload);

		let Some(secondary_id) = first_secondary_id(&items) else {
			return Err(ResolutionError::SecondaryIdNotFound {
				label: info.label,
				internal_id: info.internal_id,
			}
			.into());
		};
		debug!(target = "feedwalk::pipeline", label = %info.label, internal_id = %info.internal_id, %secondary_id, probed = items.len(), "place resolved");

		Ok(EntityInfo {
			secondary_id: Some(secondary_id),
			..info
		})
	}
}

/// Place id of the first record, in listing order, with a non-empty
/// `poi.id`.
pub fn first_secondary_id(records: &[Value]) -> Option<String> {
	records.iter().find_map(|record| {
		let poi = record.get("poi")?;
		serde_json::from_value::<PoiRef>(poi.clone()).ok()?.id
	})
}

#[async_trait]
impl Pipeline for Place {
	type Info = EntityInfo;
	type Position = Cursor;

	fn label(&self) -> &str {
		&self.label
	}

	async fn resolve_info(&self, options: &RequestOptions) -> Result<EntityInfo> {
		self.info.get_or_try_init(|| self.resolve_uncached(options)).await.cloned()
	}

	/// Follows the place listing's own cursor from `cursor`.
	///
	/// An info without a place id yields a single
	/// [`ResolutionError::SecondaryIdNotFound`].
	fn videos<'a, F>(&'a self, info: &EntityInfo, count: usize, cursor: Cursor, options: &RequestOptions, factory: F) -> RecordStream<'a, F::Record>
	where
		F: RecordFactory + 'a,
	{
		let Some(secondary_id) = info.secondary_id.as_deref() else {
			let err = ResolutionError::SecondaryIdNotFound {
				label: info.label.clone(),
				internal_id: info.internal_id.clone(),
			};
			return Box::pin(stream::once(async move { Err::<F::Record, _>(Error::from(err)) }));
		};

		let request = ListingRequest {
			url: self.client.config().endpoints.place_item_list.clone(),
			params: QueryParams::new()
				.with("poiId", secondary_id)
				.with("count", self.client.config().effective_page_size())
				.with_opt("msToken", options.ms_token.as_deref()),
			cursor_param: "cursor",
		};
		walk(self.client.clone(), request, ServerDriven::new(cursor), count, options.clone(), factory)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn first_record_with_a_place_wins() {
		let records = vec![
			json!({ "id": "1" }),
			json!({ "id": "2", "poi": { "id": "" } }),
			json!({ "id": "3", "poi": { "id": "900", "name": "Louvre" } }),
			json!({ "id": "4", "poi": { "id": "901" } }),
		];
		assert_eq!(first_secondary_id(&records), Some("900".to_string()));
	}

	#[test]
	fn numeric_place_ids_are_accepted() {
		assert_eq!(first_secondary_id(&[json!({ "poi": { "id": 42 } })]), Some("42".to_string()));
	}

	#[test]
	fn no_place_tag_means_none() {
		assert_eq!(first_secondary_id(&[json!({ "id": "1" }), json!({ "poi": null })]), None);
		assert_eq!(first_secondary_id(&[]), None);
	}
}
