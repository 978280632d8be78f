//! Single-request dispatch against a chosen session.
//!
//! The dispatcher assembles one GET from caller parameters and the session's
//! derived context, sends it through the [`Transport`], and normalizes the
//! answer into a [`RequestOutcome`]. It performs no retry: a failure is
//! returned to the caller, who decides whether to try again on another
//! session.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use feedwalk_protocol::StatusEnvelope;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::session::{Session, SessionPool};
use crate::transport::{HttpRequest, Transport};

/// Outcome of one dispatch: a decoded JSON object or a typed failure.
pub type RequestOutcome = Result<Value>;

/// Request headers keyed by name.
pub type Headers = BTreeMap<String, String>;

/// Query parameters for one request. Values are stored in their query form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces a parameter.
	pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
		self.insert(name, value);
		self
	}

	/// Adds the parameter only when `value` is present.
	pub fn with_opt<V: Display>(self, name: impl Into<String>, value: Option<V>) -> Self {
		match value {
			Some(value) => self.with(name, value),
			None => self,
		}
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
		self.0.insert(name.into(), value.to_string());
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

/// Per-call options accepted by every pipeline operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Pin the session; `None` lets the pool's policy choose.
	pub session_index: Option<usize>,
	/// Extra headers, applied over the session's own.
	pub headers: Option<Headers>,
	/// Explicit `msToken`, overriding the session cookie.
	pub ms_token: Option<String>,
}

impl RequestOptions {
	pub fn with_session_index(mut self, index: usize) -> Self {
		self.session_index = Some(index);
		self
	}

	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.get_or_insert_with(Headers::new).insert(name.into(), value.into());
		self
	}

	pub fn with_ms_token(mut self, token: impl Into<String>) -> Self {
		self.ms_token = Some(token.into());
		self
	}
}

/// Issues requests against sessions from a shared pool.
#[derive(Clone)]
pub struct Dispatcher {
	pool: Arc<SessionPool>,
	transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher").field("pool", &self.pool).finish_non_exhaustive()
	}
}

impl Dispatcher {
	pub fn new(pool: Arc<SessionPool>, transport: Arc<dyn Transport>) -> Self {
		Self { pool, transport }
	}

	pub fn pool(&self) -> &SessionPool {
		&self.pool
	}

	/// Acquires the session a call should run on.
	pub fn acquire(&self, options: &RequestOptions) -> Result<Arc<Session>> {
		self.pool.acquire(options.session_index)
	}

	/// Assembles the request without sending it.
	///
	/// Precedence, lowest first: session params, then caller params; session
	/// headers, then the session cookie header, then caller headers. Header
	/// names are lower-cased so overrides are case-insensitive.
	pub fn build_request(&self, url: &str, params: &QueryParams, session: &Session, headers: Option<&Headers>) -> Result<HttpRequest> {
		let parsed = Url::parse(url).map_err(|e| Error::transport(url, format!("invalid URL: {e}")))?;

		let mut query = session.query_params();
		for (name, value) in params.iter() {
			query.insert(name.to_string(), value.to_string());
		}

		let mut merged: BTreeMap<String, String> = session.headers().iter().map(|(k, v)| (k.to_ascii_lowercase(), v.clone())).collect();
		if let Some(cookie) = session.cookie_header(&parsed) {
			merged.insert("cookie".to_string(), cookie);
		}
		if let Some(headers) = headers {
			merged.extend(headers.iter().map(|(k, v)| (k.to_ascii_lowercase(), v.clone())));
		}

		Ok(HttpRequest {
			url: url.to_string(),
			query: query.into_iter().collect(),
			headers: merged.into_iter().collect(),
		})
	}

	/// Sends one request and decodes the body as a JSON object.
	///
	/// # Errors
	///
	/// - [`Error::Transport`] when the connection fails
	/// - [`Error::InvalidResponse`] on a non-2xx status, an empty or
	///   undecodable body, a non-object payload, or a non-zero service status
	pub async fn dispatch(&self, url: &str, params: &QueryParams, session: &Session, headers: Option<&Headers>) -> RequestOutcome {
		let body = self.send(url, params, session, headers).await?;
		decode_payload(url, &body).inspect_err(|err| {
			warn!(target = "feedwalk::dispatch", %url, session = session.index(), error = %err, "response rejected");
		})
	}

	/// Sends one request and returns the raw body (used for HTML pages).
	pub async fn fetch_text(&self, url: &str, params: &QueryParams, session: &Session, headers: Option<&Headers>) -> Result<String> {
		self.send(url, params, session, headers).await
	}

	async fn send(&self, url: &str, params: &QueryParams, session: &Session, headers: Option<&Headers>) -> Result<String> {
		let request = self.build_request(url, params, session, headers)?;
		debug!(target = "feedwalk::dispatch", %url, session = session.index(), params = request.query.len(), "dispatching");

		let response = self.transport.get(&request).await.map_err(|err| {
			warn!(target = "feedwalk::dispatch", %url, session = session.index(), error = %err, timeout = err.timeout, "transport failed");
			Error::transport(url, err.message)
		})?;

		if !response.is_success() {
			warn!(target = "feedwalk::dispatch", %url, session = session.index(), status = response.status, "non-success status");
			return Err(Error::invalid(url, format!("HTTP status {}", response.status)));
		}
		if response.body.trim().is_empty() {
			warn!(target = "feedwalk::dispatch", %url, session = session.index(), "empty body");
			return Err(Error::invalid(url, "empty body"));
		}
		Ok(response.body)
	}
}

/// Decodes a response body into a JSON object and checks the service status.
pub fn decode_payload(url: &str, body: &str) -> RequestOutcome {
	let value: Value = serde_json::from_str(body).map_err(|e| Error::invalid(url, format!("undecodable body: {e}")))?;
	if !value.is_object() {
		return Err(Error::invalid(url, "payload is not a JSON object"));
	}

	let status = StatusEnvelope::from_payload(&value);
	if !status.is_ok() {
		let message = status.status_msg.filter(|m| !m.is_empty()).unwrap_or_else(|| "no message".to_string());
		return Err(Error::invalid(url, format!("service status {}: {message}", status.status_code)));
	}
	Ok(value)
}
