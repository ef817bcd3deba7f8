use serde::{Deserialize, Serialize};

use crate::data_models::PageResult;

fn default_n() -> i64 {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    /// Search query, natural language. Optional when `url` is given.
    #[serde(default)]
    pub q: Option<String>,
    /// Fetch this URL directly instead of searching.
    #[serde(default)]
    pub url: Option<String>,
    /// What to look for in the pages; steers the summarizer.
    #[serde(default)]
    pub search_context: Option<String>,
    /// Number of pages to return, 1 to 15.
    #[serde(default = "default_n")]
    pub n: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<PageResult>,
}
