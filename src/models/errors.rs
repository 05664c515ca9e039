//! Centralized Error Handling Module
//!
//! Every failure carries a unique code so log lines can be grepped and
//! counted. Error codes follow the pattern CATEGORY_SPECIFIC_ERROR:
//! - HTTP_xxx: marketplace / metadata requests
//! - OUTPUT_xxx: writing the result files
//!
//! Only `OUTPUT_xxx` errors are fatal to a run. HTTP errors are retried by
//! the client and finally collapse into "no data".

use std::fmt;
use std::time::Duration;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // HTTP Errors
    // ============================================
    /// Timeout, connection reset, DNS failure
    HttpTransient,
    /// HTTP 429
    HttpRateLimited,
    /// HTTP 404 - the resource does not exist
    HttpNotFound,
    /// Any other non-200 status
    HttpStatus,
    /// 200 with a body that is not JSON
    HttpInvalidResponse,

    // ============================================
    // Output Errors
    // ============================================
    /// Output directory missing and could not be created
    OutputDirUnavailable,
    /// A result file could not be written
    OutputWriteFailed,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HttpTransient => "HTTP_TRANSIENT",
            Self::HttpRateLimited => "HTTP_RATE_LIMITED",
            Self::HttpNotFound => "HTTP_NOT_FOUND",
            Self::HttpStatus => "HTTP_STATUS",
            Self::HttpInvalidResponse => "HTTP_INVALID_RESPONSE",
            Self::OutputDirUnavailable => "OUTPUT_DIR_UNAVAILABLE",
            Self::OutputWriteFailed => "OUTPUT_WRITE_FAILED",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Delay before the next attempt, `attempt` being the 0-based index of
    /// the attempt that just failed. `None` means do not retry.
    pub fn backoff(&self, base: Duration, attempt: u32) -> Option<Duration> {
        match self {
            Self::HttpTransient | Self::HttpRateLimited | Self::HttpInvalidResponse => {
                Some(base.saturating_mul(2u32.saturating_pow(attempt)))
            }
            Self::HttpStatus => Some(base),
            _ => None,
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// HTTP 429
    pub fn rate_limited() -> Self {
        Self::new(ErrorCode::HttpRateLimited, "Rate limited (HTTP 429)")
    }

    /// HTTP 404
    pub fn not_found(url: &str) -> Self {
        Self::new(ErrorCode::HttpNotFound, format!("Not found: {}", url))
    }

    /// Unexpected HTTP status
    pub fn http_status(status: u16, url: &str) -> Self {
        Self::new(ErrorCode::HttpStatus, format!("HTTP {} for {}", status, url))
    }

    /// Output directory could not be prepared
    pub fn output_dir(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::with_source(
            ErrorCode::OutputDirUnavailable,
            format!("Output directory unavailable: {}", path.display()),
            source,
        )
    }

    /// A result file could not be written
    pub fn write_failed(
        path: &std::path::Path,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::with_source(
            ErrorCode::OutputWriteFailed,
            format!("Failed to write {}", path.display()),
            source,
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::new(ErrorCode::HttpInvalidResponse, format!("Invalid JSON body: {}", err))
        } else if err.is_timeout() {
            Self::new(ErrorCode::HttpTransient, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::HttpTransient, "Connection failed")
        } else {
            Self::new(ErrorCode::HttpTransient, err.to_string())
        }
    }
}
