use thiserror::Error;

/// Errors that can occur when validating movie requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MovieError {
    #[error("Movie title cannot be empty")]
    EmptyTitle,
    #[error("Movie title too long (max {max} bytes)")]
    TitleTooLong { max: usize },
    #[error("Update expression cannot be empty")]
    EmptyUpdateExpression,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_error_display() {
        assert_eq!(
            MovieError::EmptyTitle.to_string(),
            "Movie title cannot be empty"
        );
        assert_eq!(
            MovieError::TitleTooLong { max: 2048 }.to_string(),
            "Movie title too long (max 2048 bytes)"
        );
    }
}
