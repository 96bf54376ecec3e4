//! Movie <-> item conversion functions.
//!
//! Pure functions for converting between [`Movie`] and the generic
//! [`Item`] mapping handed to the store gateway.

use std::collections::{BTreeMap, HashMap};

use serde_json::Number;

use crate::movie::{InfoValue, Movie};

use super::error::{RepositoryError, Result};
use super::keys::{PARTITION_KEY, SORT_KEY};
use super::types::{AttributeValue, Item};

pub const INFO_ATTRIBUTE: &str = "info";

/// Convert a Movie to a store item.
pub fn encode(movie: &Movie) -> Item {
    let mut item = HashMap::with_capacity(3);

    item.insert(
        PARTITION_KEY.to_string(),
        AttributeValue::S(movie.title.clone()),
    );
    item.insert(
        SORT_KEY.to_string(),
        AttributeValue::N(movie.year.to_string()),
    );
    item.insert(
        INFO_ATTRIBUTE.to_string(),
        AttributeValue::M(
            movie
                .info
                .iter()
                .map(|(k, v)| (k.clone(), info_to_attribute(v)))
                .collect(),
        ),
    );

    item
}

/// Convert a store item to a Movie.
///
/// A missing or NULL `info` attribute decodes to an empty bag.
pub fn decode(item: &Item) -> Result<Movie> {
    let info = match item.get(INFO_ATTRIBUTE) {
        None | Some(AttributeValue::Null) => BTreeMap::new(),
        Some(AttributeValue::M(map)) => decode_map(map)?,
        Some(other) => {
            return Err(RepositoryError::Decode(format!(
                "{INFO_ATTRIBUTE} must be a map, found {}",
                other.type_name()
            )))
        }
    };

    Ok(Movie {
        title: get_string(item, PARTITION_KEY)?,
        year: get_i64(item, SORT_KEY)?,
        info,
    })
}

/// Convert a single info value to its storage encoding.
pub fn info_to_attribute(value: &InfoValue) -> AttributeValue {
    match value {
        InfoValue::Null => AttributeValue::Null,
        InfoValue::Bool(b) => AttributeValue::Bool(*b),
        InfoValue::Number(n) => AttributeValue::N(n.to_string()),
        InfoValue::String(s) => AttributeValue::S(s.clone()),
        InfoValue::List(l) => AttributeValue::L(l.iter().map(info_to_attribute).collect()),
        InfoValue::Map(m) => AttributeValue::M(
            m.iter()
                .map(|(k, v)| (k.clone(), info_to_attribute(v)))
                .collect(),
        ),
    }
}

/// Convert a single stored value back to an info value.
///
/// Binary values have no info counterpart and are rejected.
pub fn attribute_to_info(value: &AttributeValue) -> Result<InfoValue> {
    Ok(match value {
        AttributeValue::Null => InfoValue::Null,
        AttributeValue::Bool(b) => InfoValue::Bool(*b),
        AttributeValue::N(n) => InfoValue::Number(parse_number(n)?),
        AttributeValue::S(s) => InfoValue::String(s.clone()),
        AttributeValue::L(l) => InfoValue::List(
            l.iter()
                .map(attribute_to_info)
                .collect::<Result<Vec<_>>>()?,
        ),
        AttributeValue::M(m) => InfoValue::Map(decode_map(m)?),
        AttributeValue::B(_) => {
            return Err(RepositoryError::Decode(
                "binary values are not supported in info".to_string(),
            ))
        }
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn decode_map(map: &HashMap<String, AttributeValue>) -> Result<BTreeMap<String, InfoValue>> {
    map.iter()
        .map(|(k, v)| Ok((k.clone(), attribute_to_info(v)?)))
        .collect()
}

fn parse_number(n: &str) -> Result<Number> {
    serde_json::from_str::<Number>(n)
        .map_err(|e| RepositoryError::Decode(format!("Invalid number {n:?}: {e}")))
}

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String> {
    item.get(key)
        .and_then(|v| v.as_s())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::Decode(format!("Missing or invalid field: {}", key)))
}

/// Get a required integer attribute.
fn get_i64(item: &Item, key: &str) -> Result<i64> {
    let n = item
        .get(key)
        .and_then(|v| v.as_n())
        .ok_or_else(|| RepositoryError::Decode(format!("Missing or invalid field: {}", key)))?;
    n.parse()
        .map_err(|e| RepositoryError::Decode(format!("Invalid integer {}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movie() -> Movie {
        let mut cast = BTreeMap::new();
        cast.insert("lead".to_string(), InfoValue::from("Leonardo DiCaprio"));
        cast.insert("count".to_string(), InfoValue::from(12));

        Movie::new("Inception", 2010)
            .with_info("genre", "scifi")
            .with_info("rating", 8.8)
            .with_info("oscars", 4)
            .with_info("color", true)
            .with_info("sequel", InfoValue::Null)
            .with_info("tags", vec![InfoValue::from("dream"), InfoValue::from(1.5)])
            .with_info("cast", cast)
    }

    #[test]
    fn test_movie_round_trip() {
        let movie = sample_movie();
        let item = encode(&movie);
        let parsed = decode(&item).unwrap();

        assert_eq!(movie, parsed);
    }

    #[test]
    fn test_empty_info_round_trip() {
        let movie = Movie::new("Heat", 1995);
        assert_eq!(decode(&encode(&movie)).unwrap(), movie);
    }

    #[test]
    fn test_item_has_key_attributes() {
        let item = encode(&sample_movie());

        assert_eq!(item.get("title").unwrap().as_s(), Some("Inception"));
        assert_eq!(item.get("year").unwrap().as_n(), Some("2010"));
        assert_eq!(
            item.get("info").unwrap().as_m().unwrap().get("genre"),
            Some(&AttributeValue::S("scifi".to_string()))
        );
    }

    #[test]
    fn test_decode_missing_info_is_empty() {
        let mut item = HashMap::new();
        item.insert("title".to_string(), AttributeValue::S("Heat".to_string()));
        item.insert("year".to_string(), AttributeValue::N("1995".to_string()));

        assert_eq!(decode(&item).unwrap(), Movie::new("Heat", 1995));

        item.insert("info".to_string(), AttributeValue::Null);
        assert_eq!(decode(&item).unwrap(), Movie::new("Heat", 1995));
    }

    #[test]
    fn test_decode_missing_title() {
        let mut item = HashMap::new();
        item.insert("year".to_string(), AttributeValue::N("1995".to_string()));

        let err = decode(&item).unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Decode("Missing or invalid field: title".to_string())
        );
    }

    #[test]
    fn test_decode_year_type_mismatch() {
        let mut item = HashMap::new();
        item.insert("title".to_string(), AttributeValue::S("Heat".to_string()));
        item.insert("year".to_string(), AttributeValue::S("1995".to_string()));

        assert!(matches!(decode(&item), Err(RepositoryError::Decode(_))));
    }

    #[test]
    fn test_decode_fractional_year() {
        let mut item = HashMap::new();
        item.insert("title".to_string(), AttributeValue::S("Heat".to_string()));
        item.insert("year".to_string(), AttributeValue::N("1995.5".to_string()));

        assert!(matches!(decode(&item), Err(RepositoryError::Decode(_))));
    }

    #[test]
    fn test_decode_info_not_a_map() {
        let mut item = encode(&Movie::new("Heat", 1995));
        item.insert("info".to_string(), AttributeValue::S("oops".to_string()));

        assert!(matches!(decode(&item), Err(RepositoryError::Decode(_))));
    }

    #[test]
    fn test_binary_info_rejected() {
        assert!(matches!(
            attribute_to_info(&AttributeValue::B(vec![0xde, 0xad])),
            Err(RepositoryError::Decode(_))
        ));
    }

    #[test]
    fn test_number_encoding_keeps_precision() {
        let value: InfoValue = serde_json::from_str("12345678901234567").unwrap();
        let encoded = info_to_attribute(&value);
        assert_eq!(encoded, AttributeValue::N("12345678901234567".to_string()));
        assert_eq!(attribute_to_info(&encoded).unwrap(), value);
    }
}
