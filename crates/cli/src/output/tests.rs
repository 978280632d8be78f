use serde_json::json;

use super::*;

#[test]
fn success_envelope_is_camel_case() {
	let result = ResultBuilder::new("hashtag").inputs(json!({ "label": "funny" })).data(json!({ "total": 0 })).build();
	let value = serde_json::to_value(&result).unwrap();
	assert_eq!(value["ok"], true);
	assert_eq!(value["schemaVersion"], SCHEMA_VERSION);
	assert_eq!(value["command"], "hashtag");
	assert_eq!(value["inputs"]["label"], "funny");
	assert!(value["durationMs"].is_u64());
	assert!(value.get("error").is_none());
}

#[test]
fn error_makes_result_not_ok_even_with_data() {
	let result = ResultBuilder::new("place")
		.data(json!({ "total": 2 }))
		.error(ErrorCode::TransportFailure, "connection reset")
		.build();
	let value = serde_json::to_value(&result).unwrap();
	assert_eq!(value["ok"], false);
	assert_eq!(value["error"]["code"], "TRANSPORT_FAILURE");
	assert_eq!(value["data"]["total"], 2);
}

#[test]
fn missing_data_is_not_ok() {
	let result: CommandResult<()> = ResultBuilder::new("resolve").build();
	assert!(!result.ok);
}

#[test]
fn error_codes_display_like_they_serialize() {
	for code in [ErrorCode::ResolutionFailed, ErrorCode::ConfigError, ErrorCode::InvalidResponse] {
		assert_eq!(serde_json::to_value(code).unwrap(), json!(code.to_string()));
	}
}

#[test]
fn streamed_listing_omits_videos() {
	let data: ListingData<serde_json::Value, serde_json::Value> = ListingData {
		info: None,
		videos: None,
		total: 3,
	};
	let value = serde_json::to_value(&data).unwrap();
	assert!(value.get("videos").is_none());
	assert_eq!(value["total"], 3);
}

#[test]
fn formats_parse_case_insensitively() {
	assert_eq!("NDJSON".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
	assert!("toon".parse::<OutputFormat>().is_err());
	assert!(OutputFormat::Ndjson.streams_records());
}
