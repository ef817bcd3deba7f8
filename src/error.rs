use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search provider rejected the API key (status {0})")]
    Unauthorized(u16),
    #[error("search provider returned status {0}: {1}")]
    Status(u16, String),
    #[error("search provider unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("could not decode search provider response: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("page returned status {0}")]
    Status(u16),
    #[error("unsupported content type {0}")]
    ContentType(String),
    #[error("could not read page body: {0}")]
    Body(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("summarizer request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("summarizer returned status {0}")]
    Status(u16),
    #[error("could not decode summarizer response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("summarizer returned no text")]
    EmptyOutput,
}

/// Errors that end a `/search` request. Everything per page is recovered
/// before it gets here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Brave Search API key is needed. Set the X-Brave-Search-API-Key header.")]
    MissingApiKey,
    #[error("Brave Search API key was rejected")]
    InvalidApiKey,
    #[error("Error from Brave Search API: {0}")]
    Upstream(#[source] SearchError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingApiKey | ApiError::InvalidApiKey => StatusCode::FORBIDDEN,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Unauthorized(_) => ApiError::InvalidApiKey,
            other => ApiError::Upstream(other),
        }
    }
}

impl From<ApiError> for (StatusCode, String) {
    fn from(err: ApiError) -> Self {
        (err.status(), err.to_string())
    }
}
