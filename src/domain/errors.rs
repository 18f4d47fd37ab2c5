//! Domain errors for the portfolio world.

use thiserror::Error;

/// Domain-level errors raised while building or training a portfolio world.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or unresolvable solver/budget request. Never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Statistics were requested before the action list was built.
    #[error("Trainer actions have not been built")]
    NotBuilt,

    /// The action list was already built; a trainer serves one request.
    #[error("Trainer actions have already been built")]
    AlreadyBuilt,

    /// The action is not part of the built world.
    #[error("Action not in the built world: {0}")]
    UnknownAction(String),

    /// The run history store is unreachable or returned malformed rows.
    #[error("Data access error: {0}")]
    DataAccess(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DataAccess(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::DataAccess(format!("malformed JSON column: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_errors_map_to_data_access() {
        let err: DomainError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DomainError::DataAccess(_)));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            DomainError::NotBuilt.to_string(),
            "Trainer actions have not been built"
        );
        assert_eq!(
            DomainError::Configuration("unknown solver: foo".to_string()).to_string(),
            "Configuration error: unknown solver: foo"
        );
    }
}
