//! HTTP client initialization.
//!
//! This module provides functions to initialize the HTTP client used for every
//! console API request, and to derive the console base URL from the CLI options.

use std::net::Ipv6Addr;
use std::time::Duration;

use reqwest::ClientBuilder;
use url::Url;

use crate::config::USER_AGENT;
use crate::error_handling::InitializationError;

/// Initializes the HTTP client for the console API.
///
/// Creates a `reqwest::Client` configured with:
/// - The crate User-Agent
/// - Timeout from options
/// - Rustls TLS backend (no native TLS)
/// - Optional acceptance of invalid certificates (consoles commonly ship a
///   self-signed certificate)
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(
    timeout_seconds: u64,
    accept_invalid_certs: bool,
) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()?;
    Ok(client)
}

/// Builds the console base URL from the `--server` and `--port` options.
///
/// A bare host becomes `https://<host>:<port>/`. A host that already carries a
/// scheme is used as given; `port` only applies when it names none.
///
/// # Errors
///
/// Returns `InitializationError::BaseUrlError` if the result is not a valid URL.
pub fn console_base_url(host: &str, port: u16) -> Result<Url, InitializationError> {
    let host = host.trim();
    let to_error = |source| InitializationError::BaseUrlError {
        address: format!("{}:{}", host, port),
        source,
    };

    let mut url = if host.contains("://") {
        let mut url = Url::parse(host).map_err(to_error)?;
        if url.port().is_none() && url.set_port(Some(port)).is_err() {
            return Err(to_error(url::ParseError::InvalidPort));
        }
        url
    } else if host.parse::<Ipv6Addr>().is_ok() {
        Url::parse(&format!("https://[{}]:{}/", host, port)).map_err(to_error)?
    } else {
        Url::parse(&format!("https://{}:{}/", host, port)).map_err(to_error)?
    };

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
