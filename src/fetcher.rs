use reqwest::Client;
use std::time::Duration;

use crate::data_models::FetchedPage;
use crate::error::FetchError;

/// Shares one connection pool with the search and summarizer clients;
/// the per-page timeout is applied per request.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(client: Client, timeout: Duration) -> PageFetcher {
        PageFetcher { client, timeout }
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let res = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(content_type) = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_textual(content_type) {
                return Err(FetchError::ContentType(content_type.to_string()));
            }
        }

        let final_url = res.url().to_string();
        let html = res.text().await.map_err(FetchError::Body)?;
        Ok(FetchedPage { final_url, html })
    }
}

/// HTML, XHTML and other `text/*` bodies. A missing content type is let through.
pub fn is_textual(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/") || mime == "application/xhtml+xml"
}

/// Client shared by every outbound call. Redirects follow reqwest's default policy.
pub fn build_client(user_agent: &str) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_textual() {
        assert!(is_textual("text/html; charset=utf-8"));
        assert!(is_textual("TEXT/plain"));
        assert!(is_textual("application/xhtml+xml"));
        assert!(!is_textual("application/pdf"));
        assert!(!is_textual("image/png"));
        assert!(!is_textual("application/octet-stream"));
    }
}
