use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use std::sync::Arc;
use std::time::Instant;

use crate::pipeline::validate;

use super::AppState;
use super::models::{SearchRequest, SearchResponse};

pub const API_KEY_HEADER: &str = "x-brave-search-api-key";

/// Header key first, then a bearer token, then the process-wide key.
pub fn resolve_api_key(headers: &HeaderMap, fallback: Option<&str>) -> Option<String> {
    let from_header = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let from_bearer = || {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    from_header
        .or_else(from_bearer)
        .or(fallback)
        .map(str::to_string)
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = Instant::now();

    let valid = validate(&request).map_err(|e| {
        tracing::info!("rejected search request: {}", e);
        <(StatusCode, String)>::from(e)
    })?;

    let api_key = resolve_api_key(&headers, state.fallback_api_key.as_deref());
    let results = state.pipeline.run(&valid, api_key).await?;

    tracing::info!(
        results = results.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "search handled"
    );
    Ok(Json(SearchResponse { results }))
}

pub async fn health_handler() -> &'static str {
    "ok"
}
