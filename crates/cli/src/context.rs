use std::path::PathBuf;

use feedwalk::{Client, RequestOptions};

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::OutputFormat;

/// Global flags shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
	pub format: OutputFormat,
	config_path: Option<PathBuf>,
	extra_sessions: Vec<PathBuf>,
	session_index: Option<usize>,
	ms_token: Option<String>,
}

impl CommandContext {
	pub fn from_cli(cli: &Cli) -> Self {
		Self {
			format: cli.format,
			config_path: cli.config.clone(),
			extra_sessions: cli.sessions.clone(),
			session_index: cli.session_index,
			ms_token: cli.ms_token.clone(),
		}
	}

	/// Discovered config with `--session` files appended.
	pub fn config(&self) -> Result<AppConfig> {
		let mut config = AppConfig::discover(self.config_path.as_deref())?;
		config.sessions.extend(self.extra_sessions.iter().cloned());
		Ok(config)
	}

	pub fn client(&self) -> Result<Client> {
		self.config()?.build_client()
	}

	pub fn request_options(&self) -> RequestOptions {
		RequestOptions {
			session_index: self.session_index,
			headers: None,
			ms_token: self.ms_token.clone(),
		}
	}
}
