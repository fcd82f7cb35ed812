//! Wire types returned by the VideoVault API.
//!
//! Both structs are rebuilt for every request and serialized straight to the
//! frontend. Unknown fields stay `None` and are emitted as `null` so the
//! client always sees the same key set.

use serde::{Deserialize, Serialize};

/// Flattened view of a single search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Option<String>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub channel: Option<String>,
    pub description: Option<String>,
    /// Human readable date such as `Jan 02, 2024`.
    pub published_at: Option<String>,
    pub duration: Option<String>,
    pub view_count: Option<String>,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub videos: Vec<Video>,
    pub query: String,
    pub total_results: u64,
    pub next_page_token: Option<String>,
}

impl SearchResponse {
    pub fn new(videos: Vec<Video>, query: impl Into<String>, total_results: u64) -> Self {
        Self {
            videos,
            query: query.into(),
            total_results,
            next_page_token: None,
        }
    }
}
