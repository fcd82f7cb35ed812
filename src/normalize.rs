//! Maps the YouTube Data API `search.list` payload onto [`SearchResponse`].
//!
//! The upstream document is walked as a loose `serde_json::Value` instead of
//! typed structs: every field is optional and a single odd item must not cost
//! us the rest of the page. Failures are logged and whatever was collected up
//! to that point is returned.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::warn;

use crate::models::{SearchResponse, Video};

/// Display format shared by real and generated results, e.g. `Jan 02, 2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%b %d, %Y";

/// Thumbnail variants in order of preference. First match wins.
const THUMBNAIL_PRIORITY: [&str; 3] = ["high", "medium", "default"];

/// Never fails. Malformed input yields an empty (or partial) page.
pub fn normalize(raw: &str, query: &str) -> SearchResponse {
    let mut response = SearchResponse::new(Vec::new(), query, 0);
    if let Err(err) = fill_response(raw, &mut response) {
        let error = format!("{err:#}");
        warn!(
            %error,
            kept = response.videos.len(),
            "error parsing upstream search response"
        );
    }
    response
}

fn fill_response(raw: &str, response: &mut SearchResponse) -> Result<()> {
    let root: Value = serde_json::from_str(raw).context("decoding upstream body")?;

    response.next_page_token = root
        .get("nextPageToken")
        .and_then(text)
        .filter(|token| !token.is_empty());

    if let Some(total) = root
        .get("pageInfo")
        .and_then(|info| info.get("totalResults"))
    {
        response.total_results = total_count(total);
    }

    let Some(items) = root.get("items").and_then(Value::as_array) else {
        return Ok(());
    };

    for (index, item) in items.iter().enumerate() {
        let video = video_from_item(item).with_context(|| format!("reading item {index}"))?;
        response.videos.push(video);
    }
    Ok(())
}

fn video_from_item(item: &Value) -> Result<Video> {
    let mut video = Video {
        id: item
            .get("id")
            .and_then(|id| id.get("videoId"))
            .and_then(text),
        ..Video::default()
    };

    let Some(snippet) = item.get("snippet") else {
        return Ok(video);
    };

    video.title = text_field(snippet, "title");
    video.description = text_field(snippet, "description");
    video.channel = text_field(snippet, "channelTitle");
    video.published_at = text_field(snippet, "publishedAt").map(|raw| format_published_date(&raw));

    if let Some(thumbnails) = snippet.get("thumbnails") {
        for variant in THUMBNAIL_PRIORITY {
            if let Some(thumbnail) = thumbnails.get(variant) {
                let url = thumbnail
                    .get("url")
                    .ok_or_else(|| anyhow!("thumbnail '{variant}' has no url"))?;
                video.thumbnail = text(url);
                break;
            }
        }
    }

    Ok(video)
}

/// Formats an ISO-8601 timestamp for display. The `Z` suffix is dropped and
/// the rest read as a local date-time; anything unparseable is passed
/// through untouched.
pub fn format_published_date(iso: &str) -> String {
    let local = iso.replace('Z', "");
    NaiveDateTime::parse_from_str(&local, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&local, "%Y-%m-%dT%H:%M"))
        .map(|parsed| parsed.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| iso.to_string())
}

fn text_field(node: &Value, field: &str) -> Option<String> {
    node.get(field).and_then(text)
}

/// Scalar values rendered as text; `null` and containers count as absent.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn total_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
