//! HTTP surface under `/api/videos`.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tokio::task;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::debug;

use crate::{
    models::SearchResponse,
    search::{DEFAULT_MAX_RESULTS, SearchService},
};

pub const CATEGORIES: [&str; 12] = [
    "Technology",
    "Music",
    "Gaming",
    "Education",
    "Cooking",
    "Fitness",
    "Travel",
    "Science",
    "Programming",
    "Business",
    "Art",
    "Photography",
];

pub const HEALTH_MESSAGE: &str = "Video Vault API is running!";

#[derive(Clone)]
pub struct AppState {
    search: Arc<SearchService>,
}

impl AppState {
    pub fn new(search: SearchService) -> Self {
        Self {
            search: Arc::new(search),
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, headers, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    query: Option<String>,
    max_results: Option<i64>,
    page_token: Option<String>,
}

/// Builds the application router with CORS for the configured frontend
/// origins and per-request tracing.
pub fn router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.search.config().cors_origins)?;
    Ok(Router::new()
        .route("/api/videos/search", get(search_videos))
        .route("/api/videos/categories", get(categories))
        .route("/api/videos/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("invalid CORS origin {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET]))
}

async fn search_videos(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Query(params) = params.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let query = params.query.as_deref().unwrap_or_default().trim().to_string();
    if query.is_empty() {
        return Err(ApiError::bad_request("query must not be blank"));
    }
    let max_results = params.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    let page_token = params.page_token.filter(|token| !token.is_empty());
    debug!(%query, max_results, ?page_token, "search request");

    let search = state.search.clone();
    let response =
        task::spawn_blocking(move || search.search(&query, max_results, page_token.as_deref()))
            .await
            .map_err(|err| ApiError::internal(format!("task join error: {err}")))?;

    Ok(Json(response))
}

async fn categories() -> Json<Vec<&'static str>> {
    Json(CATEGORIES.to_vec())
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}
