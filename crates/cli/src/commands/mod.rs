mod listing;
mod resolve;
mod serve;

use feedwalk::Cursor;
use serde::Serialize;

use crate::cli::{Cli, Commands};
use crate::context::CommandContext;
use crate::error::{CliError, Result};
use crate::output::{OutputFormat, ResultBuilder, print_result};

pub async fn dispatch(cli: Cli) -> Result<()> {
	let ctx = CommandContext::from_cli(&cli);
	let command = cli.command.name();

	match cli.command {
		Commands::Hashtag { label, count, page } => listing::hashtag(&ctx, &label, count, page).await,
		Commands::Place { label, count, cursor } => listing::place(&ctx, &label, count, Cursor::from(cursor)).await,
		Commands::Search { keyword, count, offset } => listing::search(&ctx, &keyword, count, offset).await,
		Commands::Resolve { kind, label } => resolve::execute(&ctx, kind, &label).await,
		Commands::Serve { bind } => match serve::execute(&ctx, bind).await {
			Ok(()) => Ok(()),
			Err(err) => finish(ResultBuilder::<()>::new(command), Err(err), ctx.format),
		},
	}
}

/// Prints the envelope, recording `outcome`'s error if any, and passes the
/// outcome through so the exit status follows it.
pub(crate) fn finish<T: Serialize>(builder: ResultBuilder<T>, outcome: std::result::Result<(), CliError>, format: OutputFormat) -> Result<()> {
	let builder = match &outcome {
		Ok(()) => builder,
		Err(err) => builder.error(err.code(), err.to_string()),
	};
	print_result(&builder.build(), format);
	outcome
}
