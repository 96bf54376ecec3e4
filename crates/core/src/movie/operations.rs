//! Pure validation functions for movie records.

use super::error::MovieError;
use super::types::Movie;

/// Largest partition key value the table accepts, in bytes.
pub const MAX_TITLE_BYTES: usize = 2048;

/// Validates a movie title used as a partition key value.
pub fn validate_title(title: &str) -> Result<(), MovieError> {
    if title.trim().is_empty() {
        return Err(MovieError::EmptyTitle);
    }
    if title.len() > MAX_TITLE_BYTES {
        return Err(MovieError::TitleTooLong {
            max: MAX_TITLE_BYTES,
        });
    }
    Ok(())
}

/// Validates a movie before it is written.
pub fn validate_movie(movie: &Movie) -> Result<(), MovieError> {
    validate_title(&movie.title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_movie() {
        assert!(validate_movie(&Movie::new("Inception", 2010)).is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        assert_eq!(validate_title(""), Err(MovieError::EmptyTitle));
        assert_eq!(validate_title("   "), Err(MovieError::EmptyTitle));
    }

    #[test]
    fn test_oversized_title_rejected() {
        let title = "x".repeat(MAX_TITLE_BYTES + 1);
        assert_eq!(
            validate_title(&title),
            Err(MovieError::TitleTooLong {
                max: MAX_TITLE_BYTES
            })
        );
    }
}
