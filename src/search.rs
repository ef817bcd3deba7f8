use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::data_models::Candidate;
use crate::error::SearchError;

/// Brave refuses larger page sizes.
pub const MAX_PROVIDER_COUNT: usize = 20;

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub q: String,
    pub count: usize,
    pub api_key: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SearchError>;
}

// Only the fields we read from the Brave response.
#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWebResults>,
}

#[derive(Debug, Deserialize)]
struct BraveWebResults {
    #[serde(default)]
    results: Vec<BraveWebResult>,
}

#[derive(Debug, Deserialize)]
struct BraveWebResult {
    url: String,
    #[serde(default)]
    title: Option<String>,
}

pub struct BraveSearch {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl BraveSearch {
    pub fn new(client: Client, endpoint: impl Into<String>, timeout: Duration) -> BraveSearch {
        BraveSearch {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl SearchProvider for BraveSearch {
    fn name(&self) -> &'static str {
        "brave"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SearchError> {
        let count = query.count.clamp(1, MAX_PROVIDER_COUNT);
        let count_param = count.to_string();
        tracing::info!(q = %query.q, count, "querying brave search");

        let res = self
            .client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &query.api_key)
            .query(&[("q", query.q.as_str()), ("count", count_param.as_str())])
            .send()
            .await
            .map_err(SearchError::Transport)?;

        let status = res.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(SearchError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SearchError::Status(status.as_u16(), body));
        }

        let body: BraveResponse = res.json().await.map_err(SearchError::Decode)?;
        let candidates = body
            .web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .take(count)
            .map(|r| Candidate::new(r.url, r.title))
            .collect::<Vec<Candidate>>();

        tracing::info!(found = candidates.len(), "brave search returned");
        Ok(candidates)
    }
}
