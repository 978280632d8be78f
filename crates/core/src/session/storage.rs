//! Session context file loading.

use std::path::Path;

use feedwalk_protocol::SessionContextFile;
use tracing::debug;

use super::handle::Session;
use crate::error::{Error, Result};

/// Reads a session context file written by the browser-automation side.
pub fn load_session_file(path: &Path) -> Result<Session> {
	let content = std::fs::read_to_string(path).map_err(|e| Error::SessionFile {
		path: path.to_path_buf(),
		message: format!("failed to read: {e}"),
	})?;
	let file: SessionContextFile = serde_json::from_str(&content).map_err(|e| Error::SessionFile {
		path: path.to_path_buf(),
		message: format!("failed to parse: {e}"),
	})?;
	debug!(
		target = "feedwalk::session",
		path = %path.display(),
		cookies = file.state.cookies.len(),
		headers = file.headers.len(),
		"loaded session context"
	);
	Ok(Session::from_context(file))
}
