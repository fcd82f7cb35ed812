//! Chooses between the real upstream and the demo generator.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::AppConfig,
    fallback,
    models::SearchResponse,
    normalize::normalize,
    upstream::{SearchUpstream, YouTubeClient},
};

pub const DEFAULT_MAX_RESULTS: i64 = 12;
pub const MAX_RESULTS_LIMIT: u32 = 50;
pub const MIN_RESULTS: u32 = 1;

/// Bounds a requested page size to `MIN_RESULTS..=MAX_RESULTS_LIMIT`.
pub fn clamp_max_results(requested: i64) -> u32 {
    requested.clamp(i64::from(MIN_RESULTS), i64::from(MAX_RESULTS_LIMIT)) as u32
}

pub struct SearchService {
    config: AppConfig,
    upstream: Arc<dyn SearchUpstream>,
}

impl SearchService {
    pub fn new(config: AppConfig, upstream: Arc<dyn SearchUpstream>) -> Self {
        Self { config, upstream }
    }

    pub fn from_config(config: AppConfig) -> Self {
        let upstream = Arc::new(YouTubeClient::from_config(&config));
        Self::new(config, upstream)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs a search for an already trimmed, non-empty `query`.
    ///
    /// This never fails: when the upstream is disabled, unconfigured or
    /// returns an error, demo results of the clamped size are returned
    /// instead. Blocks for the duration of the upstream round trip.
    pub fn search(
        &self,
        query: &str,
        max_results: i64,
        page_token: Option<&str>,
    ) -> SearchResponse {
        let count = clamp_max_results(max_results);

        if !self.config.upstream_ready() {
            info!(query, count, "upstream disabled, serving demo results");
            return fallback::generate(query, count as usize);
        }

        match self.upstream.fetch_raw(query, count, page_token) {
            Ok(body) => normalize(&body, query),
            Err(err) => {
                let error = format!("{err:#}");
                warn!(query, %error, "upstream search failed, serving demo results");
                fallback::generate(query, count as usize)
            }
        }
    }
}
