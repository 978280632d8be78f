//! Authenticated session handles.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use feedwalk_protocol::{Cookie, SessionContextFile};
use url::Url;

/// Cookie carrying the anti-bot token the service expects as `msToken`.
pub const MS_TOKEN_COOKIE: &str = "msToken";

/// Opaque authenticated context captured by the browser-automation side.
///
/// A session is read-only once handed to the pool: the dispatcher derives
/// headers and query parameters from it but never writes back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
	index: usize,
	cookies: Vec<Cookie>,
	headers: BTreeMap<String, String>,
	params: BTreeMap<String, String>,
}

impl Session {
	/// Creates an empty session. The pool assigns the index.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a session from a session context file.
	pub fn from_context(file: SessionContextFile) -> Self {
		Self {
			index: 0,
			cookies: file.state.cookies,
			headers: file.headers,
			params: file.params,
		}
	}

	/// Adds a cookie.
	pub fn with_cookie(mut self, cookie: Cookie) -> Self {
		self.cookies.push(cookie);
		self
	}

	/// Adds a request header sent with every dispatch.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());
		self
	}

	/// Adds a query parameter sent with every dispatch.
	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(name.into(), value.into());
		self
	}

	pub(crate) fn with_index(mut self, index: usize) -> Self {
		self.index = index;
		self
	}

	/// Position of this session in its pool.
	pub fn index(&self) -> usize {
		self.index
	}

	pub fn cookies(&self) -> &[Cookie] {
		&self.cookies
	}

	pub fn headers(&self) -> &BTreeMap<String, String> {
		&self.headers
	}

	pub fn params(&self) -> &BTreeMap<String, String> {
		&self.params
	}

	/// Value of the `msToken` cookie, if the browser obtained one.
	pub fn ms_token(&self) -> Option<&str> {
		self.cookies
			.iter()
			.find(|cookie| cookie.name == MS_TOKEN_COOKIE && !cookie.value.is_empty())
			.map(|cookie| cookie.value.as_str())
	}

	/// Query parameters derived from this session: explicit params plus
	/// `msToken` when the cookie is present and no param overrides it.
	pub fn query_params(&self) -> BTreeMap<String, String> {
		let mut params = self.params.clone();
		if let Some(token) = self.ms_token() {
			params.entry(MS_TOKEN_COOKIE.to_string()).or_insert_with(|| token.to_string());
		}
		params
	}

	/// Builds the `Cookie` header for a request to `url`, keeping only
	/// unexpired cookies whose domain, path and `secure` flag admit it.
	pub fn cookie_header(&self, url: &Url) -> Option<String> {
		let now = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0.0, |elapsed| elapsed.as_secs_f64());
		self.cookie_header_at(url, now)
	}

	/// [`Session::cookie_header`] as of `now`, in seconds since the epoch.
	/// Cookies with a non-positive `expires` are session cookies and never
	/// expire.
	pub(crate) fn cookie_header_at(&self, url: &Url, now: f64) -> Option<String> {
		let host = url.host_str()?;
		let https = url.scheme() == "https";
		let pairs: Vec<String> = self
			.cookies
			.iter()
			.filter(|cookie| domain_matches(&cookie.domain, host))
			.filter(|cookie| url.path().starts_with(cookie.path.as_str()))
			.filter(|cookie| https || !cookie.secure)
			.filter(|cookie| cookie.expires <= 0.0 || cookie.expires >= now)
			.map(|cookie| format!("{}={}", cookie.name, cookie.value))
			.collect();
		(!pairs.is_empty()).then(|| pairs.join("; "))
	}
}

fn domain_matches(cookie_domain: &str, host: &str) -> bool {
	let domain = cookie_domain.trim_start_matches('.');
	if domain.is_empty() {
		return true;
	}
	host.eq_ignore_ascii_case(domain)
		|| host
			.len()
			.checked_sub(domain.len() + 1)
			.is_some_and(|split| host.as_bytes()[split] == b'.' && host[split + 1..].eq_ignore_ascii_case(domain))
}
