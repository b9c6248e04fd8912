//! Readable classification of HTTP error responses.

use reqwest::StatusCode;

/// A download request answered with an error status.
#[derive(Debug)]
pub enum HttpStatusError {
    /// HTTP 404
    NotFound(String),
    /// HTTP 401/403
    Forbidden(String),
    /// HTTP 429
    RateLimited(String),
    /// Other 4xx responses
    ClientError(u16, String),
    /// 5xx responses
    ServerError(u16, String),
}

impl std::fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpStatusError::NotFound(url) => write!(f, "Not found: {}", url),
            HttpStatusError::Forbidden(url) => write!(f, "Access forbidden: {}", url),
            HttpStatusError::RateLimited(url) => {
                write!(f, "Too many requests: {}. Try again later.", url)
            }
            HttpStatusError::ClientError(code, url) => {
                write!(f, "Request error: HTTP {} for {}", code, url)
            }
            HttpStatusError::ServerError(code, url) => {
                write!(f, "Server error: HTTP {} for {}", code, url)
            }
        }
    }
}

impl std::error::Error for HttpStatusError {}

/// Returns `Ok(())` for success statuses, otherwise a classified error.
pub fn check_status(status: StatusCode, url: &str) -> Result<(), HttpStatusError> {
    let url = url.to_string();
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(HttpStatusError::NotFound(url)),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(HttpStatusError::Forbidden(url)),
        StatusCode::TOO_MANY_REQUESTS => Err(HttpStatusError::RateLimited(url)),
        s if s.is_client_error() => Err(HttpStatusError::ClientError(s.as_u16(), url)),
        s if s.is_server_error() => Err(HttpStatusError::ServerError(s.as_u16(), url)),
        // Redirects are followed by reqwest; anything left over is unexpected
        s => Err(HttpStatusError::ClientError(s.as_u16(), url)),
    }
}
