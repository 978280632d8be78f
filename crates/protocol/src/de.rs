//! Lenient deserializers for fields the service encodes inconsistently.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts `true`/`false`, `0`/`1` and `"0"`/`"1"`; `null` reads as `false`.
pub(crate) fn flex_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Value::deserialize(deserializer)?;
	Ok(match value {
		Value::Bool(b) => b,
		Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
		Value::String(s) => matches!(s.as_str(), "1" | "true"),
		_ => false,
	})
}

/// Reads `null` as an empty list.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts an identifier encoded either as a string or as a number.
pub(crate) fn flex_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(match value {
		Some(Value::String(s)) if !s.is_empty() => Some(s),
		Some(Value::Number(n)) => Some(n.to_string()),
		_ => None,
	})
}

/// Reads a field as `T`, or as `None` when its shape is not one `T` accepts.
pub(crate) fn or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: Deserializer<'de>,
	T: serde::de::DeserializeOwned,
{
	let value = Value::deserialize(deserializer)?;
	Ok(serde_json::from_value(value).ok())
}

/// Reads a status code given as a number or a numeric string.
///
/// `null` reads as `0`. Any other shape reads as `-1` so it is never taken
/// for success.
pub(crate) fn code_value(value: &Value) -> i64 {
	match value {
		Value::Null => 0,
		Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(-1),
		Value::String(s) => s.trim().parse().unwrap_or(-1),
		_ => -1,
	}
}
