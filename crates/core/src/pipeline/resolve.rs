//! Shared label → internal id resolution.

use std::collections::HashMap;

use feedwalk_protocol::ChallengeDetail;
use tracing::debug;

use super::EntityInfo;
use crate::client::Client;
use crate::dispatch::{QueryParams, RequestOptions};
use crate::error::{Error, ResolutionError, Result};
use crate::session::Session;

/// Static label → internal id lookup consulted before any dispatch.
pub trait LabelLookup: Send + Sync {
	fn lookup(&self, label: &str) -> Option<String>;
}

impl<F> LabelLookup for F
where
	F: Fn(&str) -> Option<String> + Send + Sync,
{
	fn lookup(&self, label: &str) -> Option<String> {
		self(label)
	}
}

/// In-memory lookup table, matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
	entries: HashMap<String, String>,
}

impl LabelTable {
	pub fn new(entries: HashMap<String, String>) -> Self {
		let entries = entries.into_iter().map(|(label, id)| (normalize_label(&label).to_lowercase(), id)).collect();
		Self { entries }
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl LabelLookup for LabelTable {
	fn lookup(&self, label: &str) -> Option<String> {
		self.entries.get(&normalize_label(label).to_lowercase()).cloned()
	}
}

/// Trims whitespace and a leading `#`.
pub fn normalize_label(label: &str) -> &str {
	label.trim().trim_start_matches('#').trim()
}

/// Resolves `label` to an internal id on `session`.
///
/// A lookup-table hit returns without dispatching. Otherwise one request goes
/// to the challenge detail endpoint.
pub(crate) async fn resolve_by_label(client: &Client, session: &Session, label: &str, options: &RequestOptions) -> Result<EntityInfo> {
	let label = normalize_label(label);
	if label.is_empty() {
		return Err(ResolutionError::EmptyLabel.into());
	}

	if let Some(internal_id) = client.lookup().and_then(|lookup| lookup.lookup(label)) {
		debug!(target = "feedwalk::pipeline", %label, %internal_id, "label resolved from lookup table");
		return Ok(EntityInfo {
			label: label.to_string(),
			internal_id,
			secondary_id: None,
			raw: None,
		});
	}

	let url = client.config().endpoints.challenge_detail.as_str();
	let params = QueryParams::new().with("challengeName", label).with_opt("msToken", options.ms_token.as_deref());
	let payload = client.dispatcher().dispatch(url, &params, session, options.headers.as_ref()).await?;

	let detail: ChallengeDetail =
		serde_json::from_value(payload.clone()).map_err(|e| Error::invalid(url, format!("unexpected detail shape: {e}")))?;
	let Some((internal_id, title)) = detail.identity() else {
		return Err(ResolutionError::InternalIdNotFound {
			label: label.to_string(),
			url: url.to_string(),
		}
		.into());
	};

	debug!(target = "feedwalk::pipeline", %label, %internal_id, session = session.index(), "label resolved");
	Ok(EntityInfo {
		label: title.filter(|t| !t.is_empty()).unwrap_or(label).to_string(),
		internal_id: internal_id.to_string(),
		secondary_id: None,
		raw: Some(payload),
	})
}
