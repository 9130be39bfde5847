use thiserror::Error;

/// Failures of a single network step. Never fatal to a run.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    // ── Transport ─────────────────────────────────────────────────────
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },

    // ── Payload ───────────────────────────────────────────────────────
    #[error("invalid JSON in response: {0}")]
    InvalidJson(String),
    #[error("response is missing '{0}'")]
    MissingField(&'static str),
    #[error("invalid playback URL: {0}")]
    InvalidUrl(String),
}

impl ResolveError {
    pub fn request(url: &str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "timed out".to_string()
        } else {
            err.to_string()
        };
        Self::Request {
            url: url.to_string(),
            message,
        }
    }

    pub fn body(url: &str, err: reqwest::Error) -> Self {
        Self::Body {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}
