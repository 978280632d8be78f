//! Config file discovery and client construction.
//!
//! Lookup order: an explicit `--config`, then `./feedwalk.json`, then
//! `<config dir>/feedwalk/config.json`. Without any file every field takes
//! its default. Relative paths inside a file resolve against the file's
//! directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use feedwalk::{Client, ClientConfig, HttpTransport, HttpTransportOptions, LabelTable, SelectionPolicy, SessionPool};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CliError, Result};

pub const CONFIG_FILE_NAME: &str = "feedwalk.json";
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
	/// Session context files, in pool order.
	pub sessions: Vec<PathBuf>,
	pub selection: SelectionPolicy,
	/// Whole-request timeout; `0` disables it.
	pub timeout_secs: Option<u64>,
	pub user_agent: Option<String>,
	/// JSON object mapping labels to internal ids.
	pub labels: Option<PathBuf>,
	pub bind: Option<String>,
	pub client: ClientConfig,
}

impl AppConfig {
	/// Loads the first config file found, or defaults.
	pub fn discover(explicit: Option<&Path>) -> Result<Self> {
		if let Some(path) = explicit {
			return Self::load(path);
		}

		let local = PathBuf::from(CONFIG_FILE_NAME);
		if local.is_file() {
			return Self::load(&local);
		}
		if let Some(user) = dirs::config_dir().map(|dir| dir.join("feedwalk").join("config.json")) {
			if user.is_file() {
				return Self::load(&user);
			}
		}

		debug!(target = "feedwalk::config", "no config file found, using defaults");
		Ok(Self::default())
	}

	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|e| CliError::config(path, format!("failed to read: {e}")))?;
		let mut config: Self = serde_json::from_str(&text).map_err(|e| CliError::config(path, format!("failed to parse: {e}")))?;
		if let Some(base) = path.parent() {
			config.rebase(base);
		}
		info!(target = "feedwalk::config", path = %path.display(), sessions = config.sessions.len(), "config loaded");
		Ok(config)
	}

	fn rebase(&mut self, base: &Path) {
		for session in &mut self.sessions {
			if session.is_relative() {
				*session = base.join(&*session);
			}
		}
		if let Some(labels) = self.labels.as_mut().filter(|labels| labels.is_relative()) {
			*labels = base.join(&*labels);
		}
	}

	pub fn bind_address(&self) -> &str {
		self.bind.as_deref().unwrap_or(DEFAULT_BIND)
	}

	pub fn transport_options(&self) -> HttpTransportOptions {
		let mut options = HttpTransportOptions::default();
		if let Some(secs) = self.timeout_secs {
			options.timeout = (secs > 0).then(|| Duration::from_secs(secs));
		}
		if let Some(user_agent) = &self.user_agent {
			options.user_agent = user_agent.clone();
		}
		options
	}

	/// Builds a client over the configured sessions and the HTTP transport.
	pub fn build_client(&self) -> Result<Client> {
		if self.sessions.is_empty() {
			return Err(CliError::NoSessions);
		}
		let pool = SessionPool::from_files(&self.sessions, self.selection)?;
		let transport = HttpTransport::new(self.transport_options()).map_err(|e| CliError::HttpClient(e.to_string()))?;

		let mut builder = Client::builder(pool, Arc::new(transport)).config(self.client.clone());
		if let Some(path) = &self.labels {
			builder = builder.label_lookup(load_labels(path)?);
		}
		Ok(builder.build())
	}
}

/// Reads a label → internal id table.
pub fn load_labels(path: &Path) -> Result<LabelTable> {
	let text = std::fs::read_to_string(path).map_err(|e| CliError::config(path, format!("failed to read labels: {e}")))?;
	let entries: HashMap<String, String> =
		serde_json::from_str(&text).map_err(|e| CliError::config(path, format!("failed to parse labels: {e}")))?;
	debug!(target = "feedwalk::config", path = %path.display(), entries = entries.len(), "label table loaded");
	Ok(LabelTable::new(entries))
}

#[cfg(test)]
mod tests {
	use super::*;
	use feedwalk::LabelLookup;
	use tempfile::TempDir;

	#[test]
	fn empty_file_means_defaults() {
		let config: AppConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(config, AppConfig::default());
		assert_eq!(config.bind_address(), DEFAULT_BIND);
		assert_eq!(config.client.page_size, 30);
	}

	#[test]
	fn relative_paths_resolve_against_the_file() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("feedwalk.json");
		std::fs::write(
			&path,
			r#"{ "sessions": ["s1.json", "/abs/s2.json"], "labels": "labels.json", "selection": "random", "client": { "pageSize": 10 } }"#,
		)
		.unwrap();

		let config = AppConfig::load(&path).unwrap();
		assert_eq!(config.sessions[0], tmp.path().join("s1.json"));
		assert_eq!(config.sessions[1], PathBuf::from("/abs/s2.json"));
		assert_eq!(config.labels, Some(tmp.path().join("labels.json")));
		assert_eq!(config.selection, SelectionPolicy::Random);
		assert_eq!(config.client.page_size, 10);
	}

	#[test]
	fn unparseable_file_is_a_config_error() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("broken.json");
		std::fs::write(&path, "{ sessions: ").unwrap();
		let err = AppConfig::load(&path).unwrap_err();
		assert!(matches!(err, CliError::Config { .. }));
		assert!(err.to_string().contains("failed to parse"));
	}

	#[test]
	fn no_sessions_is_rejected_before_any_request() {
		let err = AppConfig::default().build_client().unwrap_err();
		assert!(matches!(err, CliError::NoSessions));
	}

	#[test]
	fn zero_timeout_disables_it() {
		let config = AppConfig {
			timeout_secs: Some(0),
			user_agent: Some("custom".into()),
			..AppConfig::default()
		};
		let options = config.transport_options();
		assert_eq!(options.timeout, None);
		assert_eq!(options.user_agent, "custom");
	}

	#[test]
	fn label_tables_load_from_json() {
		let tmp = TempDir::new().unwrap();
		let path = tmp.path().join("labels.json");
		std::fs::write(&path, r#"{ "funny": "111" }"#).unwrap();
		let table = load_labels(&path).unwrap();
		assert_eq!(table.lookup("funny"), Some("111".to_string()));
	}
}
