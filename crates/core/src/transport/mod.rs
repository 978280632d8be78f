//! Transport abstraction the dispatcher issues requests through.
//!
//! The core never talks to the network directly. A [`Transport`] turns a
//! fully assembled [`HttpRequest`] into a status code and body; timeouts,
//! proxies and TLS are the implementation's business.

use async_trait::async_trait;
use thiserror::Error;

/// Scripted in-memory transport for tests.
pub mod fake;
/// `reqwest`-backed transport.
pub mod http;

pub use fake::{FakeReply, FakeTransport};
pub use http::{HttpTransport, HttpTransportOptions};

/// A fully assembled GET request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
	pub url: String,
	pub query: Vec<(String, String)>,
	pub headers: Vec<(String, String)>,
}

impl HttpRequest {
	/// Returns the value of query parameter `name`, if present.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.query.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	/// Returns the value of header `name` (case-insensitive), if present.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Raw answer from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
	pub status: u16,
	pub body: String,
}

impl HttpResponse {
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Connection-level failure reported by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
	pub message: String,
	pub timeout: bool,
}

impl TransportError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			timeout: false,
		}
	}

	pub fn timeout(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			timeout: true,
		}
	}
}

/// Issues requests on behalf of the dispatcher.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
