//! Conversions between store-neutral values and `aws-sdk-dynamodb` values.
//!
//! Shared by the DynamoDB gateway and the table tooling so both write items
//! the same way.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue as SdkValue;
use super::error::RepositoryError;
use super::types::{AttributeValue, Item, Key};

/// SDK-side item representation.
pub type SdkItem = HashMap<String, SdkValue>;

/// Convert a single value to its SDK form.
pub fn value_to_sdk(value: &AttributeValue) -> SdkValue {
    match value {
        AttributeValue::S(s) => SdkValue::S(s.clone()),
        AttributeValue::N(n) => SdkValue::N(n.clone()),
        AttributeValue::Bool(b) => SdkValue::Bool(*b),
        AttributeValue::Null => SdkValue::Null(true),
        AttributeValue::B(bytes) => SdkValue::B(Blob::new(bytes.clone())),
        AttributeValue::L(list) => SdkValue::L(list.iter().map(value_to_sdk).collect()),
        AttributeValue::M(map) => SdkValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_sdk(v)))
                .collect(),
        ),
    }
}

/// Convert a single SDK value to the store-neutral form.
///
/// Typed sets have no neutral counterpart and are read as lists.
pub fn value_from_sdk(value: &SdkValue) -> Result<AttributeValue, RepositoryError> {
    Ok(match value {
        SdkValue::S(s) => AttributeValue::S(s.clone()),
        SdkValue::N(n) => AttributeValue::N(n.clone()),
        SdkValue::Bool(b) => AttributeValue::Bool(*b),
        SdkValue::Null(_) => AttributeValue::Null,
        SdkValue::B(blob) => AttributeValue::B(blob.as_ref().to_vec()),
        SdkValue::L(list) => AttributeValue::L(
            list.iter()
                .map(value_from_sdk)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        SdkValue::M(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), value_from_sdk(v)?)))
                .collect::<Result<HashMap<_, _>, RepositoryError>>()?,
        ),
        SdkValue::Ss(set) => AttributeValue::L(set.iter().cloned().map(AttributeValue::S).collect()),
        SdkValue::Ns(set) => AttributeValue::L(set.iter().cloned().map(AttributeValue::N).collect()),
        SdkValue::Bs(set) => AttributeValue::L(
            set.iter()
                .map(|blob| AttributeValue::B(blob.as_ref().to_vec()))
                .collect(),
        ),
        other => {
            return Err(RepositoryError::Decode(format!(
                "Unsupported attribute value: {:?}",
                other
            )))
        }
    })
}

/// Convert a store-neutral item to its SDK form.
pub fn item_to_sdk(item: &Item) -> SdkItem {
    item.iter()
        .map(|(k, v)| (k.clone(), value_to_sdk(v)))
        .collect()
}

/// Convert an SDK item to the store-neutral form.
pub fn item_from_sdk(item: &SdkItem) -> Result<Item, RepositoryError> {
    item.iter()
        .map(|(k, v)| Ok((k.clone(), value_from_sdk(v)?)))
        .collect()
}

/// Convert a primary key to the SDK key map.
pub fn key_to_sdk(key: &Key) -> SdkItem {
    item_to_sdk(&key.to_item())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::{InfoValue, Movie};
    use crate::storage::{derive_key, encode};

    #[test]
    fn test_movie_item_round_trip() {
        let movie = Movie::new("Inception", 2010)
            .with_info("genre", "scifi")
            .with_info("rating", 8.8)
            .with_info("sequel", InfoValue::Null);
        let item = encode(&movie);

        assert_eq!(item_from_sdk(&item_to_sdk(&item)).unwrap(), item);
    }

    #[test]
    fn test_key_has_typed_attributes() {
        let key = key_to_sdk(&derive_key("Heat", 1995).unwrap());

        assert_eq!(key.len(), 2);
        assert_eq!(key.get("title"), Some(&SdkValue::S("Heat".to_string())));
        assert_eq!(key.get("year"), Some(&SdkValue::N("1995".to_string())));
    }

    #[test]
    fn test_null_is_encoded_as_null_true() {
        assert_eq!(value_to_sdk(&AttributeValue::Null), SdkValue::Null(true));
    }

    #[test]
    fn test_string_set_reads_as_list() {
        let value = SdkValue::Ss(vec!["a".to_string(), "b".to_string()]);

        assert_eq!(
            value_from_sdk(&value).unwrap(),
            AttributeValue::L(vec![
                AttributeValue::S("a".to_string()),
                AttributeValue::S("b".to_string()),
            ])
        );
    }

    #[test]
    fn test_binary_round_trip() {
        let value = AttributeValue::B(vec![1, 2, 3]);
        assert_eq!(value_from_sdk(&value_to_sdk(&value)).unwrap(), value);
    }
}
