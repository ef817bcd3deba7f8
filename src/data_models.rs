use serde::{Deserialize, Serialize};

/// A URL/title pair returned by the search provider, before fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub title: Option<String>,
}

impl Candidate {
    pub fn new(url: String, title: Option<String>) -> Candidate {
        Candidate { url, title }
    }
}

#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Where redirects ended up.
    pub final_url: String,
    pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub url: String,
    pub page_title: String,
    pub page_contents: String,
}
