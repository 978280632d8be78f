use feedwalk::{Cursor, Pipeline, Video, VideoFactory};
use futures::StreamExt;
use serde_json::json;
use tracing::info;

use super::finish;
use crate::context::CommandContext;
use crate::error::{CliError, Result};
use crate::output::{ListingData, ResultBuilder, print_record};

pub async fn hashtag(ctx: &CommandContext, label: &str, count: usize, page: u32) -> Result<()> {
	let builder = ResultBuilder::new("hashtag").inputs(json!({ "label": label, "count": count, "page": page }));
	let client = match ctx.client() {
		Ok(client) => client,
		Err(err) => return finish(builder, Err(err), ctx.format),
	};
	info!(target = "feedwalk", %label, count, page, "walking hashtag");
	collect(ctx, builder, &client.hashtag(label), count, page).await
}

pub async fn place(ctx: &CommandContext, label: &str, count: usize, cursor: Cursor) -> Result<()> {
	let builder = ResultBuilder::new("place").inputs(json!({ "label": label, "count": count, "cursor": cursor }));
	let client = match ctx.client() {
		Ok(client) => client,
		Err(err) => return finish(builder, Err(err), ctx.format),
	};
	info!(target = "feedwalk", %label, count, %cursor, "walking place");
	collect(ctx, builder, &client.place(label), count, cursor).await
}

pub async fn search(ctx: &CommandContext, keyword: &str, count: usize, offset: u64) -> Result<()> {
	let builder = ResultBuilder::new("search").inputs(json!({ "keyword": keyword, "count": count, "offset": offset }));
	let client = match ctx.client() {
		Ok(client) => client,
		Err(err) => return finish(builder, Err(err), ctx.format),
	};
	info!(target = "feedwalk", %keyword, count, offset, "running search");
	collect(ctx, builder, &client.search(keyword), count, offset).await
}

/// Resolves `entity`, drains its stream and prints the envelope.
///
/// Records collected before a failure are kept in the envelope next to the
/// error. With streamed output they have already been printed.
async fn collect<P: Pipeline>(
	ctx: &CommandContext,
	builder: ResultBuilder<ListingData<P::Info, Video>>,
	entity: &P,
	count: usize,
	from: P::Position,
) -> Result<()> {
	let options = ctx.request_options();
	let info = match entity.resolve_info(&options).await {
		Ok(info) => info,
		Err(err) => return finish(builder, Err(err.into()), ctx.format),
	};

	let streaming = ctx.format.streams_records();
	let mut videos = Vec::new();
	let mut total = 0usize;
	let mut outcome: std::result::Result<(), CliError> = Ok(());

	let mut stream = entity.videos(&info, count, from, &options, VideoFactory);
	while let Some(item) = stream.next().await {
		match item {
			Ok(video) => {
				total += 1;
				if streaming {
					print_record(&video);
				} else {
					videos.push(video);
				}
			}
			Err(err) => {
				outcome = Err(err.into());
				break;
			}
		}
	}

	let data = ListingData {
		info: Some(info),
		videos: (!streaming).then_some(videos),
		total,
	};
	finish(builder.data(data), outcome, ctx.format)
}
