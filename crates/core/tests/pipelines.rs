//! End-to-end pipeline behavior against a scripted transport.

use std::collections::HashMap;
use std::sync::Arc;

use feedwalk::{
	Client, ClientConfig, Cursor, Endpoints, ErrorKind, FakeTransport, LabelTable, Pipeline, RequestOptions, ResolutionError, SelectionPolicy, Session, SessionPool,
	VideoFactory,
};
use futures::{StreamExt, TryStreamExt};
use serde_json::{Value, json};

const BASE: &str = "https://feed.test";

fn endpoints() -> Endpoints {
	Endpoints::with_base(BASE)
}

fn client_with_sessions(transport: &FakeTransport, sessions: usize) -> Client {
	let sessions = (0..sessions).map(|i| Session::new().with_param("device_id", format!("dev-{i}"))).collect();
	let pool = SessionPool::new(sessions, SelectionPolicy::RoundRobin);
	let config = ClientConfig {
		endpoints: endpoints(),
		..ClientConfig::default()
	};
	Client::new(pool, Arc::new(transport.clone()), config)
}

fn client(transport: &FakeTransport) -> Client {
	client_with_sessions(transport, 1)
}

fn detail(id: &str, title: &str) -> Value {
	json!({ "statusCode": 0, "challengeInfo": { "challenge": { "id": id, "title": title } } })
}

fn ids(videos: &[feedwalk::Video]) -> Vec<&str> {
	videos.iter().filter_map(|v| v.id()).collect()
}

#[tokio::test]
async fn hashtag_walk_yields_records_in_order_and_stops() -> anyhow::Result<()> {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_detail, detail("111", "funny"));
	transport.push_json(&e.challenge_item_list, json!({ "itemList": [{ "id": "A" }, { "id": "B" }], "cursor": 30, "hasMore": true }));
	transport.push_json(&e.challenge_item_list, json!({ "itemList": [{ "id": "C" }], "cursor": 60, "hasMore": false }));

	let client = client(&transport);
	let hashtag = client.hashtag("funny");
	let options = RequestOptions::default();
	let info = hashtag.resolve_info(&options).await?;
	assert_eq!(info.internal_id, "111");
	assert_eq!(info.label, "funny");

	let videos: Vec<_> = hashtag.videos(&info, 3, 1, &options, VideoFactory).try_collect().await?;
	assert_eq!(ids(&videos), ["A", "B", "C"]);

	let listing = transport.requests_to(&e.challenge_item_list);
	assert_eq!(listing.len(), 2);
	assert_eq!(listing[0].param("challengeID"), Some("111"));
	assert_eq!(listing[0].param("cursor"), Some("0"));
	assert_eq!(listing[0].param("count"), Some("30"));
	assert_eq!(listing[1].param("cursor"), Some("30"));
	assert_eq!(transport.requests_to(&e.challenge_detail)[0].param("challengeName"), Some("funny"));
	Ok(())
}

#[tokio::test]
async fn hashtag_page_three_starts_at_offset_sixty() -> anyhow::Result<()> {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_item_list, json!({ "itemList": [{ "id": "X" }], "hasMore": false }));

	let client = Client::builder(SessionPool::new(vec![Session::new()], SelectionPolicy::RoundRobin), Arc::new(transport.clone()))
		.config(ClientConfig {
			endpoints: e.clone(),
			..ClientConfig::default()
		})
		.label_lookup(LabelTable::new(HashMap::from([("funny".to_string(), "111".to_string())])))
		.build();
	let hashtag = client.hashtag("#funny");
	let info = hashtag.resolve_info(&RequestOptions::default()).await?;
	assert_eq!(info.internal_id, "111");
	assert!(info.raw.is_none());
	assert!(transport.requests_to(&e.challenge_detail).is_empty());

	let videos: Vec<_> = hashtag.videos(&info, 30, 3, &RequestOptions::default(), VideoFactory).try_collect().await?;
	assert_eq!(ids(&videos), ["X"]);
	assert_eq!(transport.requests_to(&e.challenge_item_list)[0].param("cursor"), Some("60"));
	Ok(())
}

#[tokio::test]
async fn resolution_is_idempotent() -> anyhow::Result<()> {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_detail, detail("111", "funny"));

	let client = client(&transport);
	let hashtag = client.hashtag("funny");
	let first = hashtag.resolve_info(&RequestOptions::default()).await?;
	let second = hashtag.resolve_info(&RequestOptions::default()).await?;
	assert_eq!(first, second);
	assert_eq!(transport.requests().len(), 1);
	assert_eq!(hashtag.cached_info(), Some(&first));
	Ok(())
}

#[tokio::test]
async fn failed_resolution_is_not_cached() {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_detail, json!({ "statusCode": 0, "challengeInfo": {} }));
	transport.push_json(&e.challenge_detail, detail("222", "retry"));

	let client = client(&transport);
	let hashtag = client.hashtag("retry");
	let err = hashtag.resolve_info(&RequestOptions::default()).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Resolution);
	assert!(hashtag.cached_info().is_none());

	let info = hashtag.resolve_info(&RequestOptions::default()).await.unwrap();
	assert_eq!(info.internal_id, "222");
}

#[tokio::test]
async fn empty_label_fails_before_dispatch() {
	let transport = FakeTransport::new();
	let client = client(&transport);
	let err = client.hashtag("  # ").resolve_info(&RequestOptions::default()).await.unwrap_err();
	assert!(matches!(err, feedwalk::Error::Resolution(ResolutionError::EmptyLabel)));
	assert!(client.search("").resolve_info(&RequestOptions::default()).await.is_err());
	assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn place_uses_first_record_with_place_tag() -> anyhow::Result<()> {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_detail, detail("555", "paris"));
	transport.push_json(
		&e.challenge_item_list,
		json!({ "itemList": [{ "id": "1" }, { "id": "2", "poi": { "id": "900" } }, { "id": "3", "poi": { "id": "901" } }], "hasMore": true }),
	);
	transport.push_json(&e.place_item_list, json!({ "itemList": [{ "id": "P1" }, { "id": "P2" }], "cursor": "30", "hasMore": true }));
	transport.push_json(&e.place_item_list, json!({ "itemList": [{ "id": "P3" }], "cursor": "60", "hasMore": false }));

	let client = client(&transport);
	let place = client.place("paris");
	let info = place.resolve_info(&RequestOptions::default()).await?;
	assert_eq!(info.internal_id, "555");
	assert_eq!(info.secondary_id.as_deref(), Some("900"));

	let probe = &transport.requests_to(&e.challenge_item_list)[0];
	assert_eq!(probe.param("cursor"), Some("30"));
	assert_eq!(probe.param("count"), Some("5"));

	let videos: Vec<_> = place.videos(&info, 1000, Cursor::Offset(0), &RequestOptions::default(), VideoFactory).try_collect().await?;
	assert_eq!(ids(&videos), ["P1", "P2", "P3"]);

	let listing = transport.requests_to(&e.place_item_list);
	assert_eq!(listing.len(), 2);
	assert_eq!(listing[0].param("poiId"), Some("900"));
	assert_eq!(listing[0].param("cursor"), Some("0"));
	assert_eq!(listing[1].param("cursor"), Some("30"));
	Ok(())
}

#[tokio::test]
async fn place_without_place_tag_fails_resolution() {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_detail, detail("555", "nowhere"));
	transport.push_json(&e.challenge_item_list, json!({ "itemList": [{ "id": "1" }], "hasMore": false }));

	let client = client(&transport);
	let err = client.place("nowhere").resolve_info(&RequestOptions::default()).await.unwrap_err();
	match err {
		feedwalk::Error::Resolution(ResolutionError::SecondaryIdNotFound { label, internal_id }) => {
			assert_eq!(label, "nowhere");
			assert_eq!(internal_id, "555");
		}
		other => panic!("unexpected error: {other}"),
	}
	assert!(transport.requests_to(&e.place_item_list).is_empty());
}

#[tokio::test]
async fn place_walk_stops_on_repeated_cursor() -> anyhow::Result<()> {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.place_item_list, json!({ "itemList": [{ "id": "P1" }], "cursor": 30, "hasMore": true }));
	transport.push_json(&e.place_item_list, json!({ "itemList": [{ "id": "P2" }], "cursor": 30, "hasMore": true }));
	transport.push_json(&e.place_item_list, json!({ "itemList": [{ "id": "never" }], "cursor": 90, "hasMore": true }));

	let client = client(&transport);
	let place = client.place("loop");
	let info = feedwalk::EntityInfo {
		label: "loop".into(),
		internal_id: "1".into(),
		secondary_id: Some("9".into()),
		raw: None,
	};
	let videos: Vec<_> = place.videos(&info, 100, Cursor::Offset(0), &RequestOptions::default(), VideoFactory).try_collect().await?;
	assert_eq!(ids(&videos), ["P1", "P2"]);
	assert_eq!(transport.pending(), 1);
	Ok(())
}

#[tokio::test]
async fn search_resolves_once_and_lists_at_offset() -> anyhow::Result<()> {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_raw(
		&e.search_page,
		200,
		r#"<html><script id="__UNIVERSAL_DATA_FOR_REHYDRATION__" type="application/json">{"__DEFAULT_SCOPE__":{"webapp.app-context":{"odinId":"odin-7"}}}</script></html>"#,
	);
	transport.push_json(&e.search_item_list, json!({ "item_list": [], "has_more": 1, "extra": { "logid": "log-42" } }));
	transport.push_json(&e.search_item_list, json!({ "item_list": [{ "id": "S1" }, { "id": "S2" }, { "id": "S3" }], "has_more": 1 }));

	let client = client(&transport);
	let search = client.search("cats");
	let info = search.resolve_info(&RequestOptions::default()).await?;
	assert_eq!(info.origin_id, "odin-7");
	assert_eq!(info.search_id, "log-42");
	search.resolve_info(&RequestOptions::default()).await?;
	assert_eq!(transport.requests_to(&e.search_page).len(), 1);

	let videos: Vec<_> = search.videos(&info, 2, 12, &RequestOptions::default(), VideoFactory).try_collect().await?;
	assert_eq!(ids(&videos), ["S1", "S2"]);

	let listing = transport.requests_to(&e.search_item_list);
	assert_eq!(listing.len(), 2);
	assert_eq!(listing[0].param("offset"), Some("0"));
	assert!(listing[0].param("search_id").is_none());
	assert_eq!(listing[1].param("offset"), Some("12"));
	assert_eq!(listing[1].param("search_id"), Some("log-42"));
	assert_eq!(listing[1].param("odinId"), Some("odin-7"));
	assert_eq!(listing[1].param("keyword"), Some("cats"));
	assert!(listing[1].param("web_search_code").is_some_and(|code| code.starts_with("%7B")));
	Ok(())
}

#[tokio::test]
async fn search_without_origin_id_fails() {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_raw(&e.search_page, 200, "<html>no blob</html>");

	let client = client(&transport);
	let err = client.search("cats").resolve_info(&RequestOptions::default()).await.unwrap_err();
	assert!(matches!(err, feedwalk::Error::Resolution(ResolutionError::OriginIdNotFound { .. })));
	assert!(transport.requests_to(&e.search_item_list).is_empty());
}

#[tokio::test]
async fn listing_failure_carries_url_and_keeps_earlier_records() {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_item_list, json!({ "itemList": [{ "id": "A" }], "hasMore": true }));
	transport.push_failure(&e.challenge_item_list, "connection reset");

	let client = client(&transport);
	let hashtag = client.hashtag("funny");
	let info = feedwalk::EntityInfo {
		label: "funny".into(),
		internal_id: "111".into(),
		secondary_id: None,
		raw: None,
	};
	let results: Vec<_> = hashtag.videos(&info, 10, 1, &RequestOptions::default(), VideoFactory).collect().await;
	assert_eq!(results.len(), 2);
	assert_eq!(results[0].as_ref().map(|v| v.id()).ok().flatten(), Some("A"));
	let err = results[1].as_ref().unwrap_err();
	assert_eq!(err.kind(), ErrorKind::TransportFailure);
	assert_eq!(err.url(), Some(e.challenge_item_list.as_str()));
}

#[tokio::test]
async fn zero_count_dispatches_nothing() -> anyhow::Result<()> {
	let transport = FakeTransport::new();
	let client = client(&transport);
	let info = feedwalk::EntityInfo {
		label: "funny".into(),
		internal_id: "111".into(),
		secondary_id: None,
		raw: None,
	};
	let videos: Vec<_> = client.hashtag("funny").videos(&info, 0, 1, &RequestOptions::default(), VideoFactory).try_collect().await?;
	assert!(videos.is_empty());
	assert!(transport.requests().is_empty());
	Ok(())
}

#[tokio::test]
async fn pinned_session_is_used_for_the_whole_traversal() -> anyhow::Result<()> {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_item_list, json!({ "itemList": [{ "id": "A" }], "hasMore": true }));
	transport.push_json(&e.challenge_item_list, json!({ "itemList": [{ "id": "B" }], "hasMore": false }));

	let client = client_with_sessions(&transport, 3);
	let info = feedwalk::EntityInfo {
		label: "funny".into(),
		internal_id: "111".into(),
		secondary_id: None,
		raw: None,
	};
	let options = RequestOptions::default().with_session_index(2);
	let _: Vec<_> = client.hashtag("funny").videos(&info, 10, 1, &options, VideoFactory).try_collect().await?;
	for request in transport.requests() {
		assert_eq!(request.param("device_id"), Some("dev-2"));
	}

	let err = client.hashtag("funny").resolve_info(&RequestOptions::default().with_session_index(7)).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::PoolIndex);
	Ok(())
}

#[tokio::test]
async fn custom_factories_receive_raw_records() -> anyhow::Result<()> {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_item_list, json!({ "itemList": [{ "id": "A", "stats": { "playCount": 7 } }], "hasMore": false }));

	let client = client(&transport);
	let info = feedwalk::EntityInfo {
		label: "funny".into(),
		internal_id: "111".into(),
		secondary_id: None,
		raw: None,
	};
	let plays: Vec<u64> = client
		.hashtag("funny")
		.videos(&info, 5, 1, &RequestOptions::default(), |raw: Value| raw["stats"]["playCount"].as_u64().unwrap_or(0))
		.try_collect()
		.await?;
	assert_eq!(plays, [7]);
	Ok(())
}

#[tokio::test]
async fn place_empty_probe_fails_resolution() {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_detail, detail("555", "empty"));
	transport.push_json(&e.challenge_item_list, json!({ "itemList": [] }));

	let client = client(&transport);
	let err = client.place("empty").resolve_info(&RequestOptions::default()).await.unwrap_err();
	assert!(matches!(err, feedwalk::Error::Resolution(ResolutionError::SecondaryIdNotFound { .. })), "unexpected error: {err}");
	assert!(transport.requests_to(&e.place_item_list).is_empty());
}

#[tokio::test]
async fn place_resolution_ignores_listing_fields_it_does_not_read() {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_detail, detail("555", "odd"));
	transport.push_json(&e.challenge_item_list, json!({ "itemList": [{ "id": "1" }], "cursor": -1, "hasMore": "later" }));
	transport.push_json(&e.challenge_detail, detail("556", "odder"));
	transport.push_json(&e.challenge_item_list, json!({ "itemList": [{ "id": "2", "poi": { "id": "77" } }], "cursor": { "x": 1 } }));

	let client = client(&transport);
	let err = client.place("odd").resolve_info(&RequestOptions::default()).await.unwrap_err();
	assert!(matches!(err, feedwalk::Error::Resolution(ResolutionError::SecondaryIdNotFound { .. })), "unexpected error: {err}");

	let info = client.place("odder").resolve_info(&RequestOptions::default()).await.unwrap();
	assert_eq!(info.secondary_id.as_deref(), Some("77"));
}

#[tokio::test]
async fn place_walk_keeps_last_page_with_malformed_cursor() -> anyhow::Result<()> {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.place_item_list, json!({ "itemList": [{ "id": "P1" }], "cursor": 30, "hasMore": true }));
	transport.push_json(&e.place_item_list, json!({ "itemList": [{ "id": "P2" }], "cursor": -1, "hasMore": false }));

	let client = client(&transport);
	let place = client.place("end");
	let info = feedwalk::EntityInfo {
		label: "end".into(),
		internal_id: "1".into(),
		secondary_id: Some("9".into()),
		raw: None,
	};
	let videos: Vec<_> = place.videos(&info, 100, Cursor::Offset(0), &RequestOptions::default(), VideoFactory).try_collect().await?;
	assert_eq!(ids(&videos), ["P1", "P2"]);
	Ok(())
}

#[tokio::test]
async fn place_walk_stops_when_more_is_promised_without_a_usable_cursor() -> anyhow::Result<()> {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.place_item_list, json!({ "itemList": [{ "id": "P1" }], "cursor": -5, "hasMore": true }));
	transport.push_json(&e.place_item_list, json!({ "itemList": [{ "id": "never" }], "hasMore": false }));

	let client = client(&transport);
	let place = client.place("stuck");
	let info = feedwalk::EntityInfo {
		label: "stuck".into(),
		internal_id: "1".into(),
		secondary_id: Some("9".into()),
		raw: None,
	};
	let videos: Vec<_> = place.videos(&info, 100, Cursor::Offset(0), &RequestOptions::default(), VideoFactory).try_collect().await?;
	assert_eq!(ids(&videos), ["P1"]);
	assert_eq!(transport.pending(), 1);
	Ok(())
}

#[tokio::test]
async fn string_service_status_fails_as_invalid_response() {
	let transport = FakeTransport::new();
	let e = endpoints();
	transport.push_json(&e.challenge_detail, json!({ "statusCode": "10201", "statusMsg": "blocked" }));

	let client = client(&transport);
	let err = client.hashtag("x").resolve_info(&RequestOptions::default()).await.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::InvalidResponse);
	assert!(err.to_string().contains("service status 10201: blocked"));
}
