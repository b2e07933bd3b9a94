use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use country_search::{Config, CountrySearchService, InMemoryCache, RestCountriesClient, Server, api};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // RUST_LOG wins over --log-level when both are present.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("invalid log filter {:?}", config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let provider = RestCountriesClient::new(&config.upstream_url, config.upstream_timeout)
        .context("failed to create upstream client")?;
    info!(
        upstream = %provider.base_url(),
        timeout = ?provider.timeout(),
        "upstream configured"
    );

    let service = CountrySearchService::new(Arc::new(InMemoryCache::new()), Arc::new(provider));
    let router = Arc::new(api::routes(Arc::new(service)));

    let server = Server::bind(&config.bind)
        .await
        .context("failed to start server")?;
    server
        .serve(router, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("server stopped");
    Ok(())
}
