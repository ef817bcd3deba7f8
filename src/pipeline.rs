use futures::{StreamExt, future, stream};
use reqwest::Url;
use std::collections::HashSet;
use std::sync::Arc;

use crate::api::models::SearchRequest;
use crate::data_models::{Candidate, PageResult};
use crate::error::ApiError;
use crate::extractor::ContentExtractor;
use crate::fetcher::PageFetcher;
use crate::search::{MAX_PROVIDER_COUNT, SearchProvider, SearchQuery};
use crate::summarizer::Summarizer;

pub const MIN_RESULTS: i64 = 1;
pub const MAX_RESULTS: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Search(String),
    /// Skip the search provider and process exactly this URL.
    Direct(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRequest {
    pub mode: Mode,
    pub focus: String,
    pub n: usize,
}

/// Checks a request before any network call is made.
pub fn validate(request: &SearchRequest) -> Result<ValidRequest, ApiError> {
    if !(MIN_RESULTS..=MAX_RESULTS).contains(&request.n) {
        return Err(ApiError::Validation(format!(
            "'n' must be between {MIN_RESULTS} and {MAX_RESULTS}, got {}",
            request.n
        )));
    }

    let q = request.q.as_deref().map(str::trim).unwrap_or_default();
    let url = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    let mode = match url {
        Some(url) => {
            let parsed = Url::parse(url)
                .map_err(|e| ApiError::Validation(format!("invalid 'url' {url:?}: {e}")))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(ApiError::Validation(format!(
                    "'url' must be http or https, got {url:?}"
                )));
            }
            Mode::Direct(url.to_string())
        }
        None if !q.is_empty() => Mode::Search(q.to_string()),
        None => {
            return Err(ApiError::Validation(
                "Either 'url' or 'q' parameter must be provided".to_string(),
            ));
        }
    };

    let context = request
        .search_context
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    let focus = [q, context]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join("\n");

    Ok(ValidRequest {
        mode,
        focus,
        n: request.n as usize,
    })
}

/// Candidates asked from the provider; the spare ones backfill pages that fail.
pub fn candidate_count(n: usize) -> usize {
    (n * 2).min(MAX_PROVIDER_COUNT)
}

pub fn dedup_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| !c.url.is_empty() && seen.insert(c.url.clone()))
        .collect()
}

pub struct SearchPipeline {
    search: Arc<dyn SearchProvider>,
    fetcher: PageFetcher,
    extractor: ContentExtractor,
    summarizer: Arc<dyn Summarizer>,
    page_concurrency: usize,
}

impl SearchPipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: PageFetcher,
        summarizer: Arc<dyn Summarizer>,
        page_concurrency: usize,
    ) -> SearchPipeline {
        SearchPipeline {
            search,
            fetcher,
            extractor: ContentExtractor,
            summarizer,
            page_concurrency: page_concurrency.max(1),
        }
    }

    pub fn summarizer_name(&self) -> &'static str {
        self.summarizer.name()
    }

    /// Collects up to `n` pages in candidate order. Only a failed search is an error.
    pub async fn run(
        &self,
        request: &ValidRequest,
        api_key: Option<String>,
    ) -> Result<Vec<PageResult>, ApiError> {
        let candidates = match &request.mode {
            Mode::Direct(url) => vec![Candidate::new(url.clone(), None)],
            Mode::Search(q) => {
                let api_key = api_key.ok_or(ApiError::MissingApiKey)?;
                let query = SearchQuery {
                    q: q.clone(),
                    count: candidate_count(request.n),
                    api_key,
                };
                self.search.search(&query).await.map_err(|e| {
                    tracing::error!(provider = self.search.name(), "search failed: {:#}", e);
                    ApiError::from(e)
                })?
            }
        };
        let candidates = dedup_candidates(candidates);
        let total = candidates.len();

        let results = stream::iter(candidates)
            .map(|candidate| self.process(candidate, &request.focus))
            .buffered(self.page_concurrency)
            .filter_map(future::ready)
            .take(request.n)
            .collect::<Vec<PageResult>>()
            .await;

        tracing::info!(
            candidates = total,
            returned = results.len(),
            "search request complete"
        );
        Ok(results)
    }

    /// fetch -> extract -> summarize. `None` drops the page.
    async fn process(&self, candidate: Candidate, focus: &str) -> Option<PageResult> {
        let page = match self.fetcher.fetch(&candidate.url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url = %candidate.url, "error fetching page: {:#}", e);
                return None;
            }
        };

        let base_url = Url::parse(&page.final_url).ok();
        let extracted = self.extractor.extract(&page.html, base_url.as_ref());
        if extracted.content.is_empty() {
            tracing::warn!(url = %candidate.url, "page has no readable content, skipping");
            return None;
        }

        tracing::debug!(url = %candidate.url, summarizer = self.summarizer.name(), "summarizing");
        let summary = self.summarizer.summarize(&extracted.content, focus).await;
        let page_contents = match summary {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(url = %candidate.url, "summarization failed, using cleaned text: {:#}", e);
                extracted.content
            }
        };
        tracing::debug!(url = %candidate.url, "page processed");

        // fall back to the provider's title when the page has none
        let page_title = if extracted.title.is_empty() {
            candidate.title.unwrap_or_default()
        } else {
            extracted.title
        };

        Some(PageResult {
            url: candidate.url,
            page_title,
            page_contents,
        })
    }
}
