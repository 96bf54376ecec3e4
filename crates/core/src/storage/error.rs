use std::time::Duration;

use thiserror::Error;

use crate::movie::MovieError;

/// Errors that can occur during repository and gateway operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Store error: {0}")]
    Store(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Condition error: {0}")]
    Condition(String),
}

impl From<MovieError> for RepositoryError {
    fn from(err: MovieError) -> Self {
        RepositoryError::BadRequest(err.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Movie",
            id: "Inception (2010)".to_string(),
        };
        assert_eq!(error.to_string(), "Movie not found: Inception (2010)");
    }

    #[test]
    fn test_repository_error_store_display() {
        let error = RepositoryError::Store("Throughput exceeded, please retry".to_string());
        assert_eq!(
            error.to_string(),
            "Store error: Throughput exceeded, please retry"
        );
    }

    #[test]
    fn test_repository_error_timeout_display() {
        let error = RepositoryError::Timeout(Duration::from_millis(250));
        assert_eq!(error.to_string(), "Store call timed out after 250ms");
    }

    #[test]
    fn test_repository_error_condition_display() {
        let error = RepositoryError::Condition("unused value :x".to_string());
        assert_eq!(error.to_string(), "Condition error: unused value :x");
    }

    #[test]
    fn test_movie_error_becomes_bad_request() {
        let error: RepositoryError = MovieError::EmptyTitle.into();
        assert_eq!(
            error,
            RepositoryError::BadRequest("Movie title cannot be empty".to_string())
        );
    }
}
