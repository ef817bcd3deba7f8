use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BRAVE_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-lite";

/// Process-wide settings, read once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    pub brave_api_key: Option<String>,
    pub brave_search_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout: Duration,
    pub gemini_max_input_chars: usize,
    pub fetch_timeout: Duration,
    pub search_timeout: Duration,
    pub page_concurrency: usize,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            brave_api_key: None,
            brave_search_url: DEFAULT_BRAVE_SEARCH_URL.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_timeout: Duration::from_secs(30),
            gemini_max_input_chars: 100_000,
            fetch_timeout: Duration::from_secs(5),
            search_timeout: Duration::from_secs(10),
            page_concurrency: 4,
            user_agent: concat!("webglean/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads every setting from the environment.
    pub fn from_env() -> Config {
        dotenv().ok();
        let defaults = Config::default();
        Config {
            brave_api_key: get_env_opt("BRAVE_SEARCH_API_KEY"),
            brave_search_url: get_env_or_default("BRAVE_SEARCH_URL", &defaults.brave_search_url),
            gemini_api_key: get_env_opt("GEMINI_API_KEY"),
            gemini_model: get_env_or_default("GEMINI_MODEL", &defaults.gemini_model),
            gemini_base_url: get_env_or_default("GEMINI_BASE_URL", &defaults.gemini_base_url),
            gemini_timeout: Duration::from_secs(get_env_parsed("GEMINI_TIMEOUT_SECS", 30)),
            gemini_max_input_chars: get_env_parsed(
                "GEMINI_MAX_INPUT_CHARS",
                defaults.gemini_max_input_chars,
            ),
            fetch_timeout: Duration::from_secs(get_env_parsed("FETCH_TIMEOUT_SECS", 5)),
            search_timeout: Duration::from_secs(get_env_parsed("SEARCH_TIMEOUT_SECS", 10)),
            page_concurrency: get_env_parsed("PAGE_CONCURRENCY", defaults.page_concurrency).max(1),
            user_agent: get_env_or_default("USER_AGENT", &defaults.user_agent),
        }
    }
}

fn get_env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_env_opt(key).unwrap_or_else(|| default.to_string())
}

fn get_env_parsed<T: FromStr>(key: &str, default: T) -> T {
    get_env_opt(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
