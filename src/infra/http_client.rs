use crate::config::Config;
use crate::error::{Result, ScraperError};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;

/// Builds the reqwest client shared by the geo and rating lookups.
///
/// The per-request timeout is the only limit applied to external calls.
pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("villes_scraper/", env!("CARGO_PKG_VERSION"))),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.http_timeout())
        .build()
        .map_err(|e| ScraperError::Config(format!("Failed to build HTTP client: {e}")))
}

/// Joins a configured base URL and a path without doubling the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Maps a response status onto the lookup error taxonomy.
///
/// 404 and 410 mean the service has no such record; any other non-2xx is
/// treated like a transport failure.
pub fn ensure_success(service: &str, key: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => Err(ScraperError::NotFound(format!(
            "{service} has no record for {key}"
        ))),
        other => Err(ScraperError::connectivity(
            service,
            format!("HTTP {other} for {key}"),
        )),
    }
}
