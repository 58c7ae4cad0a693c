//! repo-search HTTP server entry point

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repo_search::{http, Config, ContentSource, GitHubSource, KeywordSearch};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repo_search=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting repo-search {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    config.log_config();

    let source: Arc<dyn ContentSource> = Arc::new(GitHubSource::from_config(&config.repository));
    tracing::info!(source = %source.identifier(), "Searching remote directory");

    let app = http::router(Arc::new(KeywordSearch::new(source)));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
