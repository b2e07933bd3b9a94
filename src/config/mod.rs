//! Runtime configuration, from command-line flags or the environment.

use std::time::Duration;

use clap::Parser;

use crate::upstream::DEFAULT_BASE_URL;

#[derive(Parser, Debug, Clone)]
#[command(name = "country-search")]
#[command(about = "Country lookup service with an in-memory cache")]
#[command(version)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "COUNTRY_SEARCH_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Base URL of the REST Countries API
    #[arg(long, env = "COUNTRY_SEARCH_UPSTREAM_URL", default_value = DEFAULT_BASE_URL)]
    pub upstream_url: String,

    /// Upstream request timeout in seconds
    #[arg(
        long,
        env = "COUNTRY_SEARCH_UPSTREAM_TIMEOUT",
        default_value = "10",
        value_parser = parse_seconds
    )]
    pub upstream_timeout: Duration,

    /// Log filter used when RUST_LOG is not set (e.g. "info", "country_search=debug")
    #[arg(long, env = "COUNTRY_SEARCH_LOG", default_value = "info")]
    pub log_level: String,
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: u64 = s
        .parse()
        .map_err(|_| format!("invalid number of seconds: {s}"))?;
    if secs == 0 {
        return Err("timeout must be at least one second".to_owned());
    }
    Ok(Duration::from_secs(secs))
}
