use feedwalk::Pipeline;
use serde_json::{Value, json};
use tracing::info;

use super::finish;
use crate::cli::EntityKind;
use crate::context::CommandContext;
use crate::error::Result;
use crate::output::ResultBuilder;

pub async fn execute(ctx: &CommandContext, kind: EntityKind, label: &str) -> Result<()> {
	let builder = ResultBuilder::new("resolve").inputs(json!({ "kind": kind_name(kind), "label": label }));
	info!(target = "feedwalk", kind = kind_name(kind), %label, "resolving");

	match resolve(ctx, kind, label).await {
		Ok(info) => finish(builder.data(info), Ok(()), ctx.format),
		Err(err) => finish(builder, Err(err), ctx.format),
	}
}

async fn resolve(ctx: &CommandContext, kind: EntityKind, label: &str) -> Result<Value> {
	let client = ctx.client()?;
	let options = ctx.request_options();
	let info = match kind {
		EntityKind::Hashtag => serde_json::to_value(client.hashtag(label).resolve_info(&options).await?)?,
		EntityKind::Place => serde_json::to_value(client.place(label).resolve_info(&options).await?)?,
		EntityKind::Search => serde_json::to_value(client.search(label).resolve_info(&options).await?)?,
	};
	Ok(info)
}

fn kind_name(kind: EntityKind) -> &'static str {
	match kind {
		EntityKind::Hashtag => "hashtag",
		EntityKind::Place => "place",
		EntityKind::Search => "search",
	}
}
