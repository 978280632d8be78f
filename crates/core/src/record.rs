//! Record construction hook.
//!
//! The pipelines never interpret listing items beyond what resolution
//! needs. Each raw item is handed to a [`RecordFactory`] owned by the hosting
//! application, exactly once, right before it is yielded.

use serde::Serialize;
use serde_json::Value;

/// Turns a raw listing item into the caller-facing record type.
pub trait RecordFactory: Send + Sync {
	type Record: Send;

	fn build(&self, raw: Value) -> Self::Record;
}

impl<F, R> RecordFactory for F
where
	F: Fn(Value) -> R + Send + Sync,
	R: Send,
{
	type Record = R;

	fn build(&self, raw: Value) -> R {
		self(raw)
	}
}

/// Default record: the raw item with a few typed accessors.
///
/// Serializes as the raw item, unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Video {
	raw: Value,
}

impl Video {
	pub fn new(raw: Value) -> Self {
		Self { raw }
	}

	pub fn id(&self) -> Option<&str> {
		self.raw.get("id").and_then(Value::as_str)
	}

	pub fn description(&self) -> Option<&str> {
		self.raw.get("desc").and_then(Value::as_str)
	}

	/// The author's handle (`author.uniqueId`).
	pub fn author(&self) -> Option<&str> {
		self.raw.get("author").and_then(|author| author.get("uniqueId")).and_then(Value::as_str)
	}

	pub fn as_value(&self) -> &Value {
		&self.raw
	}

	pub fn into_value(self) -> Value {
		self.raw
	}
}

/// Builds [`Video`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoFactory;

impl RecordFactory for VideoFactory {
	type Record = Video;

	fn build(&self, raw: Value) -> Video {
		Video::new(raw)
	}
}
