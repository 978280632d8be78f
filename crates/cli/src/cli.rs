use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "feedwalk")]
#[command(about = "Resolve hashtags, places and searches and walk their video listings")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = ArgAction::Count)]
	pub verbose: u8,

	/// Config file (defaults to ./feedwalk.json, then the user config dir)
	#[arg(short, long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Session context file exported from a browser; repeatable
	#[arg(long = "session", global = true, value_name = "FILE")]
	pub sessions: Vec<PathBuf>,

	/// Pin every request to this session instead of rotating
	#[arg(long, global = true, value_name = "N")]
	pub session_index: Option<usize>,

	/// msToken to send instead of the session cookie
	#[arg(long, global = true, value_name = "TOKEN")]
	pub ms_token: Option<String>,

	/// Output format
	#[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Videos tagged with a hashtag, by page
	#[command(alias = "tag")]
	Hashtag {
		label: String,
		/// Maximum number of videos
		#[arg(long, default_value_t = 30)]
		count: usize,
		/// 1-based page to start from
		#[arg(long, default_value_t = 1)]
		page: u32,
	},

	/// Videos posted at a place
	Place {
		label: String,
		#[arg(long, default_value_t = 1000)]
		count: usize,
		/// Listing cursor to start from: an offset or a token from a previous walk
		#[arg(long, default_value = "0")]
		cursor: String,
	},

	/// Videos matching a search keyword
	Search {
		keyword: String,
		#[arg(long, default_value_t = 30)]
		count: usize,
		/// Result offset
		#[arg(long, default_value_t = 0)]
		offset: u64,
	},

	/// Resolve identifiers without listing videos
	Resolve {
		#[arg(value_enum)]
		kind: EntityKind,
		label: String,
	},

	/// Serve the pipelines over HTTP
	Serve {
		/// Address to listen on (defaults to the config's `bind`, then 127.0.0.1:8000)
		#[arg(long, value_name = "ADDR")]
		bind: Option<String>,
	},
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
	Hashtag,
	Place,
	Search,
}

impl Commands {
	/// Name reported in the result envelope.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Hashtag { .. } => "hashtag",
			Commands::Place { .. } => "place",
			Commands::Search { .. } => "search",
			Commands::Resolve { .. } => "resolve",
			Commands::Serve { .. } => "serve",
		}
	}
}
