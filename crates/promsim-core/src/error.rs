//! Shared error type across promsim crates.

use thiserror::Error;

/// Stable error codes (logged and asserted on by tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Config failed to parse or validate.
    BadConfig,
    /// Unsupported config schema version.
    UnsupportedVersion,
    /// A metric name was registered twice.
    DuplicateMetric,
    /// A metric name is not a valid exposition identifier.
    InvalidMetric,
    /// Filesystem or socket failure.
    Io,
    /// Anything else.
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::DuplicateMetric => "DUPLICATE_METRIC",
            ErrorCode::InvalidMetric => "INVALID_METRIC",
            ErrorCode::Io => "IO",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PromsimError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum PromsimError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version: {0}")]
    UnsupportedVersion(u32),
    #[error("metric already registered: {0}")]
    DuplicateMetric(String),
    #[error("invalid metric name: {0}")]
    InvalidMetric(String),
    #[error("io: {0}")]
    Io(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PromsimError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PromsimError::BadConfig(_) => ErrorCode::BadConfig,
            PromsimError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            PromsimError::DuplicateMetric(_) => ErrorCode::DuplicateMetric,
            PromsimError::InvalidMetric(_) => ErrorCode::InvalidMetric,
            PromsimError::Io(_) => ErrorCode::Io,
            PromsimError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<std::io::Error> for PromsimError {
    fn from(e: std::io::Error) -> Self {
        PromsimError::Io(e.to_string())
    }
}
