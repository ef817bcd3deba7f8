use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::SummarizeError;

/// The key never goes in the URL, so it cannot end up in logged errors.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Condenses cleaned page text toward what the caller is looking for.
#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &'static str;
    async fn summarize(&self, text: &str, focus: &str) -> Result<String, SummarizeError>;
}

/// Used when no generative-AI key is configured.
#[derive(Debug, Default)]
pub struct Passthrough;

#[async_trait]
impl Summarizer for Passthrough {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    async fn summarize(&self, text: &str, _focus: &str) -> Result<String, SummarizeError> {
        Ok(text.to_string())
    }
}

/// Picks the summarizer once at startup.
pub fn summarizer_from_config(config: &Config, client: Client) -> Arc<dyn Summarizer> {
    match &config.gemini_api_key {
        Some(key) => Arc::new(GeminiSummarizer {
            client,
            api_key: key.clone(),
            model: config.gemini_model.clone(),
            base_url: config.gemini_base_url.clone(),
            timeout: config.gemini_timeout,
            max_input_chars: config.gemini_max_input_chars,
        }),
        None => Arc::new(Passthrough),
    }
}

pub fn build_prompt(text: &str, focus: &str) -> String {
    let focus = if focus.trim().is_empty() {
        "(none given: condense the whole page, keeping all of its key information)"
    } else {
        focus
    };
    format!(
        r#"You are a machine that takes in text of a webpage and
if the search query is relevant to the page,
    returns a comprehensive yet focussed version of the page containing all the relevant information.
if the search query is not relevant to the page,
    returns "NOT RELEVANT" and nothing else.

YOU MUST NOT ADD YOUR OWN DIALOGUES.
YOU MUST RETAIN URLS AS IT IS.
YOU MUST BE CONCISE YET PRECISE.
YOU MUST OUTPUT IN PROPERLY ANNOTATED MARKDOWN FORMAT.

SEARCH QUERY:
{focus}

WEBPAGE TEXT:
{text}
"#
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GenerateCandidate>,
}

#[derive(Debug, Deserialize)]
struct GenerateCandidate {
    #[serde(default)]
    content: Content,
}

pub struct GeminiSummarizer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    max_input_chars: usize,
}

impl GeminiSummarizer {
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn summarize(&self, text: &str, focus: &str) -> Result<String, SummarizeError> {
        let clipped: String = text.chars().take(self.max_input_chars).collect();
        let req = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(&clipped, focus)),
                }],
            }],
        };

        let res = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .json(&req)
            .send()
            .await
            .map_err(|e| SummarizeError::Transport(e.without_url()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(SummarizeError::Status(status.as_u16()));
        }

        let body: GenerateResponse = res
            .json()
            .await
            .map_err(|e| SummarizeError::Decode(e.without_url()))?;
        let out = body
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<String>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if out.trim().is_empty() {
            return Err(SummarizeError::EmptyOutput);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough_returns_input_unchanged() {
        let text = "Title\nSome body (example.com)";
        let out = Passthrough.summarize(text, "anything").await.unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn test_no_key_selects_passthrough() {
        let summarizer = summarizer_from_config(&Config::default(), Client::new());
        assert_eq!(summarizer.name(), "passthrough");
    }

    #[test]
    fn test_key_selects_gemini() {
        let config = Config {
            gemini_api_key: Some("k".into()),
            ..Config::default()
        };
        let summarizer = summarizer_from_config(&config, Client::new());
        assert_eq!(summarizer.name(), "gemini");
    }

    #[tokio::test]
    async fn test_transport_error_does_not_expose_key() {
        let config = Config {
            gemini_api_key: Some("SUPERSECRET".into()),
            gemini_base_url: "http://127.0.0.1:1".into(),
            gemini_timeout: Duration::from_secs(2),
            ..Config::default()
        };
        let summarizer = summarizer_from_config(&config, Client::new());
        let err = summarizer.summarize("page text", "focus").await.unwrap_err();
        assert!(matches!(err, SummarizeError::Transport(_)));
        let rendered = format!("{:#} {:?}", err, err);
        assert!(!rendered.contains("SUPERSECRET"), "{rendered}");
    }

    #[test]
    fn test_prompt_carries_focus_and_text() {
        let prompt = build_prompt("PAGE BODY", "rust async\nruntimes");
        assert!(prompt.contains("SEARCH QUERY:\nrust async\nruntimes"));
        assert!(prompt.contains("WEBPAGE TEXT:\nPAGE BODY"));
        assert!(prompt.contains("NOT RELEVANT"));
    }

    #[test]
    fn test_prompt_without_focus_asks_for_condensation() {
        let prompt = build_prompt("PAGE BODY", "  ");
        assert!(prompt.contains("condense the whole page"));
    }
}
