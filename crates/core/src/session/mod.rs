//! Session handles and the pool that hands them out.
//!
//! Sessions are produced out-of-band by a browser-automation collaborator and
//! loaded here either directly or from session context files.

/// Session handle type.
pub mod handle;
/// Pool and selection policy.
pub mod pool;
/// Session context file loading.
pub mod storage;

pub use handle::{MS_TOKEN_COOKIE, Session};
pub use pool::{SelectionPolicy, SessionPool};
pub use storage::load_session_file;
