//! Error types for dispatch, resolution and session handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the pool, the dispatcher and the pipelines.
///
/// Every variant propagates to the immediate caller untouched. Nothing in
/// this crate retries, substitutes a different session, or swallows a
/// failure; callers that want resilience catch, rotate sessions and build a
/// fresh entity themselves.
#[derive(Debug, Error)]
pub enum Error {
	/// The connection itself failed (DNS, TLS, reset, timeout).
	#[error("transport failure for {url}: {message}")]
	Transport { url: String, message: String },

	/// The transport succeeded but the answer is unusable.
	#[error("invalid response from {url}: {reason}")]
	InvalidResponse { url: String, reason: String },

	/// A label could not be turned into the identifiers the service requires.
	#[error(transparent)]
	Resolution(#[from] ResolutionError),

	/// The caller asked for a session index the pool does not have.
	#[error("session index {index} out of range (pool holds {size} sessions)")]
	PoolIndex { index: usize, size: usize },

	/// A session context file could not be read or parsed.
	#[error("session file {}: {message}", path.display())]
	SessionFile { path: PathBuf, message: String },
}

/// Resolution failures. Terminal for the entity instance that raised them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
	#[error("label must not be empty")]
	EmptyLabel,

	#[error("label {label:?} did not resolve to an internal id via {url}")]
	InternalIdNotFound { label: String, url: String },

	#[error("no probe record for {label:?} (internal id {internal_id}) exposed a secondary id")]
	SecondaryIdNotFound { label: String, internal_id: String },

	#[error("origin id for {keyword:?} not found in the page at {url}")]
	OriginIdNotFound { keyword: String, url: String },

	#[error("search id for {keyword:?} not echoed by {url}")]
	SearchIdNotFound { keyword: String, url: String },
}

/// Coarse classification of [`Error`] for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	TransportFailure,
	InvalidResponse,
	Resolution,
	PoolIndex,
	SessionFile,
}

impl Error {
	pub(crate) fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
		Error::Transport {
			url: url.into(),
			message: message.into(),
		}
	}

	pub(crate) fn invalid(url: impl Into<String>, reason: impl Into<String>) -> Self {
		Error::InvalidResponse {
			url: url.into(),
			reason: reason.into(),
		}
	}

	/// Returns the error's kind.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::Transport { .. } => ErrorKind::TransportFailure,
			Error::InvalidResponse { .. } => ErrorKind::InvalidResponse,
			Error::Resolution(_) => ErrorKind::Resolution,
			Error::PoolIndex { .. } => ErrorKind::PoolIndex,
			Error::SessionFile { .. } => ErrorKind::SessionFile,
		}
	}

	/// Returns the URL involved, when the error came from a request.
	pub fn url(&self) -> Option<&str> {
		match self {
			Error::Transport { url, .. } | Error::InvalidResponse { url, .. } => Some(url),
			Error::Resolution(ResolutionError::InternalIdNotFound { url, .. })
			| Error::Resolution(ResolutionError::OriginIdNotFound { url, .. })
			| Error::Resolution(ResolutionError::SearchIdNotFound { url, .. }) => Some(url),
			_ => None,
		}
	}
}
