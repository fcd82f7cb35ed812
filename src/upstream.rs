//! Blocking client for the YouTube Data API `search` endpoint.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::config::AppConfig;

/// Anything that can answer a search with a raw JSON body.
pub trait SearchUpstream: Send + Sync {
    fn fetch_raw(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<String>;
}

pub struct YouTubeClient {
    agent: ureq::Agent,
    search_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            search_url: format!("{}/search", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.api_base_url,
            config.api_key.clone(),
            config.upstream_timeout,
        )
    }
}

impl SearchUpstream for YouTubeClient {
    /// One attempt, no retries. Error messages never include the request
    /// URL since it carries the API key.
    fn fetch_raw(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<String> {
        debug!(query, max_results, page_token, "querying upstream search");

        let mut request = self
            .agent
            .get(&self.search_url)
            .query("part", "snippet")
            .query("q", query)
            .query("type", "video")
            .query("maxResults", &max_results.to_string())
            .query("key", &self.api_key);
        if let Some(token) = page_token.filter(|token| !token.is_empty()) {
            request = request.query("pageToken", token);
        }

        match request.call() {
            Ok(response) => response
                .into_string()
                .context("reading upstream search body"),
            Err(ureq::Error::Status(code, _)) => {
                bail!("upstream search returned status {code}")
            }
            Err(ureq::Error::Transport(transport)) => match transport.message() {
                Some(message) => bail!("upstream search failed ({}): {message}", transport.kind()),
                None => bail!("upstream search failed ({})", transport.kind()),
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Query,
        http::StatusCode,
        routing::get,
    };
    use serde_json::{Value, json};
    use std::{collections::HashMap, net::SocketAddr};

    async fn echo_search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        Json(json!({
            "pageInfo": { "totalResults": 1 },
            "params": params,
        }))
    }

    async fn slow_search() -> &'static str {
        tokio::time::sleep(Duration::from_secs(2)).await;
        "{}"
    }

    async fn failing_search() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Serves a stand-in upstream on an ephemeral port and returns its base URL.
    pub(crate) async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/youtube/v3")
    }

    async fn fetch(
        client: YouTubeClient,
        query: &'static str,
        max_results: u32,
        page_token: Option<&'static str>,
    ) -> Result<String> {
        tokio::task::spawn_blocking(move || client.fetch_raw(query, max_results, page_token))
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sends_fixed_search_parameters() {
        let base = spawn_upstream(Router::new().route("/youtube/v3/search", get(echo_search))).await;
        let client = YouTubeClient::new(&base, "test-key", Duration::from_secs(5));

        let body = fetch(client, "rust async", 7, None).await.unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        let params = &value["params"];
        assert_eq!(params["part"], "snippet");
        assert_eq!(params["type"], "video");
        assert_eq!(params["q"], "rust async");
        assert_eq!(params["maxResults"], "7");
        assert_eq!(params["key"], "test-key");
        assert!(params.get("pageToken").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn page_token_only_sent_when_present() {
        let base = spawn_upstream(Router::new().route("/youtube/v3/search", get(echo_search))).await;

        let client = YouTubeClient::new(&base, "k", Duration::from_secs(5));
        let body = fetch(client, "q", 5, Some("CAUQAA")).await.unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["params"]["pageToken"], "CAUQAA");

        let client = YouTubeClient::new(&base, "k", Duration::from_secs(5));
        let body = fetch(client, "q", 5, Some("")).await.unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert!(value["params"].get("pageToken").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn non_success_status_is_an_error_without_key() {
        let base =
            spawn_upstream(Router::new().route("/youtube/v3/search", get(failing_search))).await;
        let client = YouTubeClient::new(&base, "super-secret", Duration::from_secs(5));

        let err = fetch(client, "q", 5, None).await.unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("500"));
        assert!(!message.contains("super-secret"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn slow_upstream_times_out() {
        let base = spawn_upstream(Router::new().route("/youtube/v3/search", get(slow_search))).await;
        let client = YouTubeClient::new(&base, "k", Duration::from_millis(200));

        assert!(fetch(client, "q", 5, None).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unreachable_upstream_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = YouTubeClient::new(&format!("http://{addr}"), "k", Duration::from_secs(2));
        assert!(fetch(client, "q", 5, None).await.is_err());
    }
}
