//! Pagination cursor values as they appear in requests and responses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A listing cursor: either a numeric offset or an opaque token.
///
/// The service sends numeric cursors both as JSON numbers and as decimal
/// strings; [`Cursor::normalized`] folds the latter into [`Cursor::Offset`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cursor {
	Offset(u64),
	Token(String),
}

impl Cursor {
	/// Returns the cursor with decimal tokens converted to offsets.
	pub fn normalized(self) -> Self {
		match self {
			Cursor::Token(token) => match token.trim().parse::<u64>() {
				Ok(offset) => Cursor::Offset(offset),
				Err(_) => Cursor::Token(token),
			},
			offset => offset,
		}
	}

	/// Returns the numeric offset, if this is an offset cursor.
	pub fn as_offset(&self) -> Option<u64> {
		match self {
			Cursor::Offset(offset) => Some(*offset),
			Cursor::Token(_) => None,
		}
	}
}

impl Default for Cursor {
	fn default() -> Self {
		Cursor::Offset(0)
	}
}

impl From<u64> for Cursor {
	fn from(offset: u64) -> Self {
		Cursor::Offset(offset)
	}
}

impl From<String> for Cursor {
	fn from(token: String) -> Self {
		Cursor::Token(token).normalized()
	}
}

impl fmt::Display for Cursor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Cursor::Offset(offset) => write!(f, "{offset}"),
			Cursor::Token(token) => f.write_str(token),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decimal_tokens_normalize_to_offsets() {
		let cursor: Cursor = serde_json::from_str(r#""60""#).unwrap();
		assert_eq!(cursor.normalized(), Cursor::Offset(60));

		let cursor: Cursor = serde_json::from_str("30").unwrap();
		assert_eq!(cursor, Cursor::Offset(30));

		let cursor: Cursor = serde_json::from_str(r#""eyJvZmZzZXQiOjF9""#).unwrap();
		assert_eq!(cursor.clone().normalized(), cursor);
	}

	#[test]
	fn display_matches_query_encoding() {
		assert_eq!(Cursor::Offset(90).to_string(), "90");
		assert_eq!(Cursor::Token("abc".into()).to_string(), "abc");
	}
}
