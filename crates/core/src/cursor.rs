//! Pagination cursor policies.
//!
//! A policy decides where a traversal starts and how one page's summary moves
//! the state forward. The endpoints disagree: the challenge listing is
//! addressed by page number with a fixed stride, the place listing hands
//! back the next cursor itself, and search is a single call at an offset.
//!
//! Shared rules:
//! - an empty page with `has_more = true` is not terminal
//! - a next cursor that does not move forward is terminal, whatever
//!   `has_more` says, so a misbehaving server cannot livelock a traversal

use feedwalk_protocol::{Cursor, ItemListPage};

/// Transient state of one traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
	pub cursor: Cursor,
	pub has_more: bool,
	/// Records received so far, across all pages.
	pub fetched: usize,
}

/// What a policy needs to know about the page just received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
	pub records: usize,
	pub has_more: bool,
	pub next_cursor: Option<Cursor>,
}

impl From<&ItemListPage> for PageSummary {
	fn from(page: &ItemListPage) -> Self {
		Self {
			records: page.items.len(),
			has_more: page.has_more,
			next_cursor: page.next_cursor(),
		}
	}
}

/// Rule for computing the next cursor and the stop condition.
pub trait CursorPolicy: Send + Sync {
	fn initial(&self) -> PaginationState;
	fn advance(&self, state: &PaginationState, page: &PageSummary) -> PaginationState;
}

/// Fixed-stride paging: the cursor for page `p` is `(p - 1) * page_size`.
///
/// The server's cursor is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageIndexed {
	page_size: u64,
	page: u64,
}

impl PageIndexed {
	/// Pages are 1-based; page `0` is treated as page `1`. A zero page size
	/// is treated as one.
	pub fn new(page_size: u32, page: u32) -> Self {
		Self {
			page_size: u64::from(page_size.max(1)),
			page: u64::from(page.max(1)),
		}
	}

	/// Offset of the first record on the starting page.
	pub fn offset(&self) -> u64 {
		(self.page - 1) * self.page_size
	}
}

impl CursorPolicy for PageIndexed {
	fn initial(&self) -> PaginationState {
		PaginationState {
			cursor: Cursor::Offset(self.offset()),
			has_more: true,
			fetched: 0,
		}
	}

	fn advance(&self, state: &PaginationState, page: &PageSummary) -> PaginationState {
		let next = state.cursor.as_offset().map(|offset| offset.saturating_add(self.page_size));
		let moved = next.is_some_and(|next| Some(next) != state.cursor.as_offset());
		PaginationState {
			cursor: next.map(Cursor::Offset).unwrap_or_else(|| state.cursor.clone()),
			has_more: page.has_more && moved,
			fetched: state.fetched + page.records,
		}
	}
}

/// Server-driven paging: the next cursor is whatever the previous response
/// returned. Stops as soon as `has_more` is false.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerDriven {
	start: Cursor,
}

impl ServerDriven {
	pub fn new(start: Cursor) -> Self {
		Self { start: start.normalized() }
	}
}

impl CursorPolicy for ServerDriven {
	fn initial(&self) -> PaginationState {
		PaginationState {
			cursor: self.start.clone(),
			has_more: true,
			fetched: 0,
		}
	}

	fn advance(&self, state: &PaginationState, page: &PageSummary) -> PaginationState {
		let fetched = state.fetched + page.records;
		let next = match &page.next_cursor {
			Some(next) if page.has_more && moves_forward(&state.cursor, next) => next.clone(),
			_ => {
				return PaginationState {
					cursor: state.cursor.clone(),
					has_more: false,
					fetched,
				};
			}
		};
		PaginationState {
			cursor: next,
			has_more: true,
			fetched,
		}
	}
}

/// One request at a caller-chosen offset; never advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SinglePage {
	offset: u64,
}

impl SinglePage {
	pub fn new(offset: u64) -> Self {
		Self { offset }
	}
}

impl CursorPolicy for SinglePage {
	fn initial(&self) -> PaginationState {
		PaginationState {
			cursor: Cursor::Offset(self.offset),
			has_more: true,
			fetched: 0,
		}
	}

	fn advance(&self, state: &PaginationState, page: &PageSummary) -> PaginationState {
		PaginationState {
			cursor: state.cursor.clone(),
			has_more: false,
			fetched: state.fetched + page.records,
		}
	}
}

/// Numeric cursors must strictly increase; opaque tokens must change.
fn moves_forward(current: &Cursor, next: &Cursor) -> bool {
	match (current, next) {
		(Cursor::Offset(current), Cursor::Offset(next)) => next > current,
		(current, next) => current != next,
	}
}
