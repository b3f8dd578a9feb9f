// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("no valid note link found in input")]
    NoLink,
    #[error("request failed: {0}")]
    Fetch(String),
    #[error("upstream returned {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to parse page: {0}")]
    Parse(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ScrapeError {
    /// Classify a reqwest error the same way for page and image fetches.
    pub fn from_request(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ScrapeError::Fetch(format!("TimeoutError: {}", e))
        } else if e.is_connect() {
            ScrapeError::Fetch(format!("ConnectError: {}", e))
        } else {
            ScrapeError::Fetch(format!("RequestError: {}", e))
        }
    }
}
