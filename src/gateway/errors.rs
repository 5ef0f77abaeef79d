//! Gateway error types

use std::io;

use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced by a document gateway.
///
/// Driver errors are translated into one of these before they leave the
/// gateway, so callers never see backend-specific types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Transient network/IO failure; safe to retry immediately
    #[error("transient database failure: {0}")]
    Transient(String),

    /// Database unreachable or not initialized
    #[error("database unreachable: {0}")]
    Connection(String),

    /// Any other backend failure
    #[error("database error: {0}")]
    Backend(String),
}

impl GatewayError {
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Only transient failures are retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Translates an IO error from a file-backed store.
    pub fn from_io(context: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::Interrupted | io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                Self::Transient(format!("{}: {}", context, err))
            }
            _ => Self::Backend(format!("{}: {}", context, err)),
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        Self::Backend(format!("malformed document data: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(GatewayError::transient("reset").is_retryable());
        assert!(!GatewayError::connection("down").is_retryable());
        assert!(!GatewayError::backend("bad").is_retryable());
    }

    #[test]
    fn test_io_translation() {
        let err = GatewayError::from_io("write", io::Error::from(io::ErrorKind::TimedOut));
        assert!(err.is_retryable());

        let err = GatewayError::from_io("write", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, GatewayError::Backend(_)));
    }
}
