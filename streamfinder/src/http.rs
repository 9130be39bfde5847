use std::time::Duration;

use anyhow::{Result, anyhow};
use reqwest::{Client, Proxy};

use crate::error::ResolveError;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; SM-G973F) AppleWebKit/537.36";

/**
    Build the HTTP client shared by the scanner and the resolver,
    optionally routed through an HTTP or SOCKS5 proxy.
*/
pub fn build_client(proxy: Option<&str>) -> Result<Client> {
    if let Some(proxy_url) = proxy {
        let proxy = Proxy::all(proxy_url)
            .map_err(|e| anyhow!("Invalid proxy URL '{}': {}", proxy_url, e))?;
        Client::builder()
            .proxy(proxy)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client with proxy: {}", e))
    } else {
        Client::builder()
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))
    }
}

/**
    GET a URL with a browser User-Agent and return its body.
    Non-2xx statuses are errors.
*/
pub async fn fetch_text(client: &Client, url: &str, timeout: Duration) -> Result<String, ResolveError> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| ResolveError::request(url, e))?;

    if !response.status().is_success() {
        return Err(ResolveError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    response.text().await.map_err(|e| ResolveError::body(url, e))
}
