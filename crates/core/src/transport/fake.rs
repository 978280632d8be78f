//! Fake transport for unit testing dispatch, resolution and pagination.
//!
//! Replies are scripted per URL and consumed in order; every request the
//! dispatcher issues is recorded for inspection.
//!
//! # Example
//!
//! ```ignore
//! let transport = FakeTransport::new();
//! transport.push_json(DETAIL_URL, json!({ "challengeInfo": { "challenge": { "id": "111" } } }));
//! let client = Client::new(pool, Arc::new(transport.clone()), config);
//! let info = client.hashtag("funny").resolve_info(&RequestOptions::default()).await?;
//! assert_eq!(transport.requests_to(DETAIL_URL).len(), 1);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::{HttpRequest, HttpResponse, Transport, TransportError};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum FakeReply {
	/// 200 with the value serialized as the body.
	Json(Value),
	/// Arbitrary status and body.
	Raw { status: u16, body: String },
	/// Connection-level failure.
	Fail(String),
}

#[derive(Debug, Default)]
struct FakeState {
	replies: HashMap<String, VecDeque<FakeReply>>,
	sent: Vec<HttpRequest>,
}

/// Scripted in-memory [`Transport`]. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
	state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a reply for the next request to `url`.
	pub fn push(&self, url: impl Into<String>, reply: FakeReply) {
		self.state.lock().replies.entry(url.into()).or_default().push_back(reply);
	}

	/// Queues a 200 JSON reply.
	pub fn push_json(&self, url: impl Into<String>, body: Value) {
		self.push(url, FakeReply::Json(body));
	}

	/// Queues a raw reply with the given status and body.
	pub fn push_raw(&self, url: impl Into<String>, status: u16, body: impl Into<String>) {
		self.push(url, FakeReply::Raw { status, body: body.into() });
	}

	/// Queues a connection failure.
	pub fn push_failure(&self, url: impl Into<String>, message: impl Into<String>) {
		self.push(url, FakeReply::Fail(message.into()));
	}

	/// Returns every request sent so far, in order.
	pub fn requests(&self) -> Vec<HttpRequest> {
		self.state.lock().sent.clone()
	}

	/// Returns the requests sent to `url`, in order.
	pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
		self.state.lock().sent.iter().filter(|request| request.url == url).cloned().collect()
	}

	/// Number of scripted replies not yet consumed.
	pub fn pending(&self) -> usize {
		self.state.lock().replies.values().map(VecDeque::len).sum()
	}
}

#[async_trait]
impl Transport for FakeTransport {
	async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
		let reply = {
			let mut state = self.state.lock();
			state.sent.push(request.clone());
			state.replies.get_mut(&request.url).and_then(VecDeque::pop_front)
		};

		match reply {
			Some(FakeReply::Json(value)) => Ok(HttpResponse {
				status: 200,
				body: value.to_string(),
			}),
			Some(FakeReply::Raw { status, body }) => Ok(HttpResponse { status, body }),
			Some(FakeReply::Fail(message)) => Err(TransportError::new(message)),
			None => Err(TransportError::new(format!("no scripted reply for {}", request.url))),
		}
	}
}
