//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

/// Admin API fetch error
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("HTTP error: status {0}")]
    Status(StatusCode),

    /// Request never produced a decodable response: connection, timeout,
    /// or a body that is not the expected JSON
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client result type
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_carries_code() {
        let err = FetchError::Status(StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("404"));
    }
}
