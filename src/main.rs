use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use webglean::api::{AppState, create_router};
use webglean::config::Config;
use webglean::fetcher::{PageFetcher, build_client};
use webglean::pipeline::SearchPipeline;
use webglean::search::BraveSearch;
use webglean::summarizer::summarizer_from_config;

#[derive(Parser, Debug)]
#[command(version, about = "Web search API that returns cleaned page text for AI agents")]
struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let client = build_client(&config.user_agent).context("failed to build HTTP client")?;
    let search = Arc::new(BraveSearch::new(
        client.clone(),
        config.brave_search_url.clone(),
        config.search_timeout,
    ));
    let fetcher = PageFetcher::new(client.clone(), config.fetch_timeout);
    let summarizer = summarizer_from_config(&config, client);

    let pipeline = SearchPipeline::new(search, fetcher, summarizer, config.page_concurrency);
    tracing::info!(summarizer = pipeline.summarizer_name(), "pipeline ready");
    if config.brave_api_key.is_none() {
        tracing::warn!("BRAVE_SEARCH_API_KEY not set; search requests must carry their own key");
    }

    let state = Arc::new(AppState {
        pipeline,
        fallback_api_key: config.brave_api_key.clone(),
    });

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
