//! HTTP front end over the pipelines.
//!
//! Every request builds a fresh entity, so nothing is cached across
//! requests. A failure still returns the videos collected before it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use feedwalk::{Client, Cursor, ErrorKind, Pipeline, RequestOptions, Video, VideoFactory};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::error::CliError;
use crate::output::ErrorCode;

#[derive(Clone)]
pub struct AppState {
	client: Client,
	options: RequestOptions,
}

impl AppState {
	pub fn new(client: Client, options: RequestOptions) -> Self {
		Self { client, options }
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(root))
		.route("/hashtag/{tag}", get(hashtag))
		.route("/places/{place}", get(place))
		.route("/search/{keyword}", get(search))
		.with_state(state)
}

#[derive(Debug, Serialize)]
struct VideosBody {
	videos: Vec<Video>,
	total: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	code: ErrorCode,
	videos: Vec<Video>,
	total: usize,
}

#[derive(Debug, Deserialize)]
struct HashtagQuery {
	#[serde(default = "default_count")]
	count: usize,
	#[serde(default = "first_page")]
	page: u32,
}

#[derive(Debug, Deserialize)]
struct PlaceQuery {
	#[serde(default = "default_place_count")]
	count: usize,
	#[serde(default = "first_cursor")]
	cursor: String,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
	#[serde(default = "default_count")]
	count: usize,
	#[serde(default)]
	offset: u64,
}

fn default_count() -> usize {
	30
}

fn default_place_count() -> usize {
	1000
}

fn first_page() -> u32 {
	1
}

fn first_cursor() -> String {
	"0".to_string()
}

async fn root() -> Json<serde_json::Value> {
	Json(json!({ "message": "feedwalk running" }))
}

async fn hashtag(State(state): State<AppState>, Path(tag): Path<String>, Query(query): Query<HashtagQuery>) -> Response {
	info!(target = "feedwalk::server", %tag, count = query.count, page = query.page, "hashtag request");
	collect(&state.client.hashtag(tag), query.count, query.page, &state.options).await
}

async fn place(State(state): State<AppState>, Path(place): Path<String>, Query(query): Query<PlaceQuery>) -> Response {
	info!(target = "feedwalk::server", %place, count = query.count, cursor = %query.cursor, "place request");
	collect(&state.client.place(place), query.count, Cursor::from(query.cursor), &state.options).await
}

async fn search(State(state): State<AppState>, Path(keyword): Path<String>, Query(query): Query<SearchQuery>) -> Response {
	info!(target = "feedwalk::server", %keyword, count = query.count, offset = query.offset, "search request");
	collect(&state.client.search(keyword), query.count, query.offset, &state.options).await
}

async fn collect<P: Pipeline>(entity: &P, count: usize, from: P::Position, options: &RequestOptions) -> Response {
	let info = match entity.resolve_info(options).await {
		Ok(info) => info,
		Err(err) => return failure(err, Vec::new()),
	};

	let mut videos = Vec::new();
	let mut stream = entity.videos(&info, count, from, options, VideoFactory);
	while let Some(item) = stream.next().await {
		match item {
			Ok(video) => videos.push(video),
			Err(err) => return failure(err, videos),
		}
	}

	let total = videos.len();
	Json(VideosBody { videos, total }).into_response()
}

fn failure(err: feedwalk::Error, videos: Vec<Video>) -> Response {
	let status = status_for(err.kind());
	warn!(target = "feedwalk::server", error = %err, status = status.as_u16(), collected = videos.len(), "request failed");

	let err = CliError::from(err);
	let total = videos.len();
	let body = ErrorBody {
		error: err.to_string(),
		code: err.code(),
		videos,
		total,
	};
	(status, Json(body)).into_response()
}

fn status_for(kind: ErrorKind) -> StatusCode {
	match kind {
		ErrorKind::Resolution => StatusCode::NOT_FOUND,
		ErrorKind::PoolIndex => StatusCode::BAD_REQUEST,
		ErrorKind::TransportFailure | ErrorKind::InvalidResponse => StatusCode::BAD_GATEWAY,
		ErrorKind::SessionFile => StatusCode::INTERNAL_SERVER_ERROR,
	}
}
