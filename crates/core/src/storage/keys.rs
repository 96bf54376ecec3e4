//! Primary key derivation for movie items.
//!
//! Pure functions with no side effects: identical inputs always yield an
//! identical key.

use super::error::{RepositoryError, Result};
use super::types::{AttributeValue, Key, KeyAttribute};

/// Partition key attribute name (string).
pub const PARTITION_KEY: &str = "title";

/// Sort key attribute name (number).
pub const SORT_KEY: &str = "year";

/// Derive the primary key for a movie.
///
/// Fails with `InvalidKey` when the title is blank, since an empty string
/// cannot address an item.
pub fn derive_key(title: &str, year: i64) -> Result<Key> {
    if title.trim().is_empty() {
        return Err(RepositoryError::InvalidKey(format!(
            "{PARTITION_KEY} must not be empty"
        )));
    }

    Ok(Key {
        partition: KeyAttribute {
            name: PARTITION_KEY,
            value: AttributeValue::S(title.to_string()),
        },
        sort: KeyAttribute {
            name: SORT_KEY,
            value: AttributeValue::N(year.to_string()),
        },
    })
}

/// Whether an attribute name belongs to the primary key.
pub fn is_key_attribute(name: &str) -> bool {
    name == PARTITION_KEY || name == SORT_KEY
}
