use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A value inside a movie's open `info` bag.
///
/// This is a closed sum type so the codec stays total: every variant has a
/// storage counterpart and back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<InfoValue>),
    Map(BTreeMap<String, InfoValue>),
}

impl InfoValue {
    /// Returns the string slice if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            InfoValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a `Number` value.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            InfoValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the nested map if this is a `Map` value.
    pub fn as_map(&self) -> Option<&BTreeMap<String, InfoValue>> {
        match self {
            InfoValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for InfoValue {
    fn from(value: &str) -> Self {
        InfoValue::String(value.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(value: String) -> Self {
        InfoValue::String(value)
    }
}

impl From<bool> for InfoValue {
    fn from(value: bool) -> Self {
        InfoValue::Bool(value)
    }
}

impl From<i64> for InfoValue {
    fn from(value: i64) -> Self {
        InfoValue::Number(value.into())
    }
}

impl From<i32> for InfoValue {
    fn from(value: i32) -> Self {
        InfoValue::Number(value.into())
    }
}

impl From<f64> for InfoValue {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(InfoValue::Number)
            .unwrap_or(InfoValue::Null)
    }
}

impl From<Vec<InfoValue>> for InfoValue {
    fn from(value: Vec<InfoValue>) -> Self {
        InfoValue::List(value)
    }
}

impl From<BTreeMap<String, InfoValue>> for InfoValue {
    fn from(value: BTreeMap<String, InfoValue>) -> Self {
        InfoValue::Map(value)
    }
}

/// A movie record.
///
/// `title` and `year` together identify the record in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub year: i64,
    #[serde(default)]
    pub info: BTreeMap<String, InfoValue>,
}

impl Movie {
    /// Creates a movie with an empty info bag.
    pub fn new(title: impl Into<String>, year: i64) -> Self {
        Self {
            title: title.into(),
            year,
            info: BTreeMap::new(),
        }
    }

    /// Adds an info entry.
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<InfoValue>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_builder() {
        let movie = Movie::new("Inception", 2010)
            .with_info("genre", "scifi")
            .with_info("rating", 8.8);

        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.year, 2010);
        assert_eq!(movie.info.get("genre").unwrap().as_str(), Some("scifi"));
        assert!(movie.info.get("rating").unwrap().as_number().is_some());
    }

    #[test]
    fn test_movie_deserializes_without_info() {
        let movie: Movie = serde_json::from_str(r#"{"title":"Heat","year":1995}"#).unwrap();
        assert_eq!(movie, Movie::new("Heat", 1995));
    }

    #[test]
    fn test_movie_rejects_missing_title() {
        let result = serde_json::from_str::<Movie>(r#"{"year":1995}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_info_value_untagged_json() {
        let json = r#"{
            "title": "Alien",
            "year": 1979,
            "info": {
                "directors": ["Ridley Scott"],
                "rating": 8.5,
                "rank": 12,
                "restricted": true,
                "sequel": null,
                "studio": {"name": "20th Century Fox"}
            }
        }"#;
        let movie: Movie = serde_json::from_str(json).unwrap();

        assert_eq!(
            movie.info.get("directors"),
            Some(&InfoValue::List(vec!["Ridley Scott".into()]))
        );
        assert_eq!(movie.info.get("rank"), Some(&InfoValue::from(12)));
        assert_eq!(movie.info.get("restricted"), Some(&InfoValue::Bool(true)));
        assert_eq!(movie.info.get("sequel"), Some(&InfoValue::Null));
        assert_eq!(
            movie.info["studio"].as_map().unwrap().get("name"),
            Some(&InfoValue::from("20th Century Fox"))
        );

        let back = serde_json::to_string(&movie).unwrap();
        let reparsed: Movie = serde_json::from_str(&back).unwrap();
        assert_eq!(movie, reparsed);
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert_eq!(InfoValue::from(f64::NAN), InfoValue::Null);
    }
}
