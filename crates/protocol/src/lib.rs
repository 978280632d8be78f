//! Wire types for the feed service's internal endpoints.
//!
//! This crate contains the serde-deserializable shapes of the payloads the
//! service answers with, plus the session context file format produced by the
//! browser-automation side. These types represent the "protocol layer": the
//! shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond (de)serialization and field access
//! * Lenient: The upstream schema is undocumented and drifts, so every field
//!   is defaulted and both camelCase and snake_case spellings are accepted
//!   where the service is known to use both
//!
//! Resolution and pagination logic built on these types lives in `feedwalk`.

mod de;

pub mod cookie;
pub mod cursor;
pub mod detail;
pub mod listing;
pub mod status;

pub use cookie::*;
pub use cursor::*;
pub use detail::*;
pub use listing::*;
pub use status::*;
