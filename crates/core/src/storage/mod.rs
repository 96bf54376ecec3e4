mod codec;
mod error;
pub mod expression;
mod http_mapping;
mod keys;
mod repository;
#[cfg(feature = "dynamodb")]
pub mod sdk;
mod traits;
mod types;
mod update;

pub use codec::{attribute_to_info, decode, encode, info_to_attribute, INFO_ATTRIBUTE};
pub use error::{RepositoryError, Result};
pub use expression::UpdateExpression;
pub use http_mapping::repository_error_to_status_code;
pub use keys::{derive_key, is_key_attribute, PARTITION_KEY, SORT_KEY};
pub use repository::{MovieRepository, ScanOutcome, DEFAULT_CALL_TIMEOUT};
pub use traits::{ItemStream, StoreGateway};
pub use types::{AttributeValue, Item, Key, KeyAttribute};
pub use update::{placeholders, UpdateSpec};
