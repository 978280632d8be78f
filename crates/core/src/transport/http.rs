use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::trace;

use super::{HttpRequest, HttpResponse, Transport, TransportError};

const DEFAULT_USER_AGENT: &str =
	"Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Construction options for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportOptions {
	/// Whole-request timeout. The core imposes none of its own.
	pub timeout: Option<Duration>,
	/// Fallback user agent, used when neither session nor caller sets one.
	pub user_agent: String,
}

impl Default for HttpTransportOptions {
	fn default() -> Self {
		Self {
			timeout: Some(Duration::from_secs(30)),
			user_agent: DEFAULT_USER_AGENT.to_string(),
		}
	}
}

/// Transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: ReqwestClient,
}

impl HttpTransport {
	pub fn new(options: HttpTransportOptions) -> Result<Self, TransportError> {
		let mut builder = ReqwestClient::builder().user_agent(options.user_agent);
		if let Some(timeout) = options.timeout {
			builder = builder.timeout(timeout);
		}
		let client = builder
			.build()
			.map_err(|e| TransportError::new(format!("failed to build HTTP client: {e}")))?;
		Ok(Self { client })
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
		let mut builder = self.client.get(&request.url).query(&request.query);
		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		let response = builder.send().await.map_err(map_reqwest_error)?;
		let status = response.status().as_u16();
		let body = response.text().await.map_err(map_reqwest_error)?;
		trace!(target = "feedwalk::transport", url = %request.url, status, bytes = body.len(), "response received");
		Ok(HttpResponse { status, body })
	}
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
	if err.is_timeout() {
		TransportError::timeout(err.to_string())
	} else {
		TransportError::new(err.to_string())
	}
}
