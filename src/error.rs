// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! The split the rest of the crate relies on: retryable failures (rate
//! limits, timeouts) are handled locally by the guard; everything else
//! propagates unchanged, carrying the literal upstream diagnostic so the
//! operator can act on it without reading logs.

use std::fmt;
use thiserror::Error;

/// Graph API error codes as a typed vocabulary.
///
/// Instead of matching against magic numbers like `17`, the upstream
/// error-code space is encoded in the type system. Each variant tells you
/// what the Graph API reported and enables pattern-based recovery without
/// numerically-typed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphErrorCode {
    /// Request throttled (application, user, page, or custom-tier limit).
    RateLimited,
    /// A request parameter failed Graph validation (includes unknown fields).
    InvalidParameter,
    /// The access token is expired, revoked, or otherwise invalid.
    InvalidToken,
    /// The token lacks permission for the requested resource.
    PermissionDenied,
    /// Graph-side failure (codes 1/2 or a bare 5xx status).
    ServerError,
    /// HTTP status fallback when the error body is unparseable.
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet.
    Unknown(i64),
}

impl GraphErrorCode {
    /// Maps a numeric Graph error code into the typed vocabulary.
    ///
    /// Throttle codes per the Graph rate-limiting docs: 4 (application),
    /// 17 (user), 32 (page), 613 (custom tier).
    pub fn from_api_response(code: i64) -> Self {
        match code {
            4 | 17 | 32 | 613 => Self::RateLimited,
            100 => Self::InvalidParameter,
            190 => Self::InvalidToken,
            200..=299 => Self::PermissionDenied,
            1 | 2 => Self::ServerError,
            other => Self::Unknown(other),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            other => Self::HttpStatus(other),
        }
    }

    /// Whether this error is worth retrying. Only throttles qualify:
    /// server errors carry no backoff contract and surface immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

impl fmt::Display for GraphErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::InvalidParameter => write!(f, "invalid_parameter"),
            Self::InvalidToken => write!(f, "invalid_token"),
            Self::PermissionDenied => write!(f, "permission_denied"),
            Self::ServerError => write!(f, "server_error"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "code_{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed credential/configuration — fatal at startup.
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    /// Transport-level failure from reqwest (DNS, TLS, connect, timeout).
    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    /// The Graph API returned an error payload. Fatal unless the code is
    /// retryable; the upstream message is attached verbatim.
    #[error("Graph API error ({code}): {message}")]
    GraphService {
        code: GraphErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    /// A rate-limited call stayed rate-limited through every retry.
    #[error("Rate limit exceeded after {attempts} attempts: {message}")]
    RateLimitExceeded { attempts: u32, message: String },

    /// A timed-out call stayed unreachable through every retry.
    #[error("Upstream unreachable after {attempts} attempts: {message}")]
    NetworkTimeout { attempts: u32, message: String },

    /// The upstream violated its own pagination contract.
    #[error("Pagination contract violated: {0}")]
    Pagination(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AppError {
    /// Whether the guard should retry this failure with backoff.
    ///
    /// Retryable: upstream throttles, plus transport timeouts and
    /// connection resets. Everything else, 5xx included, surfaces
    /// immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::GraphService { code, .. } => code.is_retryable(),
            AppError::NetworkFailure(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Whether this failure is specifically an upstream throttle.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            AppError::GraphService { code, .. } if code.is_rate_limited()
        )
    }
}

// Preserve the error chain when bubbling up from helper crates.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_codes_map_to_rate_limited() {
        for code in [4, 17, 32, 613] {
            assert_eq!(
                GraphErrorCode::from_api_response(code),
                GraphErrorCode::RateLimited
            );
        }
    }

    #[test]
    fn validation_and_token_codes_are_fatal() {
        assert!(!GraphErrorCode::from_api_response(100).is_retryable());
        assert!(!GraphErrorCode::from_api_response(190).is_retryable());
        assert!(!GraphErrorCode::from_api_response(250).is_retryable());
    }

    #[test]
    fn http_429_is_retryable_without_a_body() {
        let code = GraphErrorCode::from_http_status(429);
        assert!(code.is_retryable());
        assert!(code.is_rate_limited());
    }

    #[test]
    fn server_errors_are_fatal_not_retryable() {
        assert!(!GraphErrorCode::from_http_status(500).is_retryable());
        assert!(!GraphErrorCode::from_http_status(502).is_retryable());
        assert!(!GraphErrorCode::from_api_response(1).is_retryable());
        assert!(!GraphErrorCode::from_api_response(2).is_retryable());
    }

    #[test]
    fn graph_service_error_keeps_upstream_message_verbatim() {
        let err = AppError::GraphService {
            code: GraphErrorCode::InvalidToken,
            message: "Error validating access token: Session has expired".to_string(),
            status: reqwest::StatusCode::BAD_REQUEST,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("Session has expired"));
        assert!(!err.is_retryable());
    }
}
