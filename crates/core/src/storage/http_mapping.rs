//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `BadRequest` -> 400 (Bad Request)
/// - `Condition` -> 400 (Bad Request)
/// - `NotFound` -> 404 (Not Found)
/// - `Store` -> 500 (Internal Server Error)
/// - `Decode` -> 500 (Internal Server Error)
/// - `InvalidKey` -> 500 (Internal Server Error)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `Timeout` -> 504 (Gateway Timeout)
///
/// # Examples
///
/// ```
/// use moviestore_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Movie",
///     id: "Inception (2010)".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::BadRequest(_) => 400,
        RepositoryError::Condition(_) => 400,
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::Store(_) => 500,
        RepositoryError::Decode(_) => 500,
        RepositoryError::InvalidKey(_) => 500,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::Timeout(_) => 504,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_bad_request_maps_to_400() {
        let error = RepositoryError::BadRequest("missing title".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_condition_maps_to_400() {
        let error = RepositoryError::Condition("unresolved placeholder :r".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::NotFound {
            entity_type: "Movie",
            id: "Heat (1995)".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_data_contract_errors_map_to_500() {
        let decode = RepositoryError::Decode("year is not a number".to_string());
        let key = RepositoryError::InvalidKey("title is empty".to_string());
        let store = RepositoryError::Store("internal server error".to_string());
        assert_eq!(repository_error_to_status_code(&decode), 500);
        assert_eq!(repository_error_to_status_code(&key), 500);
        assert_eq!(repository_error_to_status_code(&store), 500);
    }

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("dns error".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_timeout_maps_to_504() {
        let error = RepositoryError::Timeout(Duration::from_secs(5));
        assert_eq!(repository_error_to_status_code(&error), 504);
    }
}
