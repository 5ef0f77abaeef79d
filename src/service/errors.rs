//! Service error types
//!
//! Client-caused: `Validation`, `InvalidKey`, `NotFound` (never retried).
//! Server-side: `Persistence`, `Connection` (surfaced after the gateway's
//! own retry budget is spent).

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::schema::SchemaError;

/// Result type for collection service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Bad shape or type of input
    #[error("{0}")]
    Validation(#[from] SchemaError),

    /// Key shape does not match how the entity kind is addressed
    #[error("{entity} records are addressed by {expected}")]
    InvalidKey {
        entity: &'static str,
        expected: String,
    },

    /// Target record does not exist
    #[error("{label} not found: {key}")]
    NotFound { label: &'static str, key: String },

    /// Gateway or storage failure
    #[error("persistence failure: {0}")]
    Persistence(GatewayError),

    /// Database unreachable
    #[error("database connection failure: {0}")]
    Connection(GatewayError),
}

impl ServiceError {
    pub fn not_found(label: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            label,
            key: key.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.code().code(),
            Self::InvalidKey { .. } => "GEO_INVALID_KEY",
            Self::NotFound { .. } => "GEO_NOT_FOUND",
            Self::Persistence(_) => "GEO_PERSISTENCE_ERROR",
            Self::Connection(_) => "GEO_CONNECTION_ERROR",
        }
    }

    /// Whether the caller caused the failure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidKey { .. } | Self::NotFound { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<GatewayError> for ServiceError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Connection(_) => Self::Connection(e),
            other => Self::Persistence(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKey;

    #[test]
    fn test_gateway_errors_split_by_kind() {
        let err = ServiceError::from(GatewayError::connection("down"));
        assert!(matches!(err, ServiceError::Connection(_)));

        let err = ServiceError::from(GatewayError::transient("reset"));
        assert!(matches!(err, ServiceError::Persistence(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("County", EntityKey::county("Loudoun", "VA"));
        assert_eq!(err.to_string(), "County not found: state_code=VA, name=Loudoun");
        assert!(err.is_client_error());
        assert_eq!(err.code(), "GEO_NOT_FOUND");
    }
}
