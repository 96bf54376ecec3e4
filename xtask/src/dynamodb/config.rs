//! Table configuration types (Functional Core - pure data).

use moviestore_core::storage::{PARTITION_KEY, SORT_KEY};

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
    pub billing_mode: BillingMode,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// DynamoDB scalar attribute types usable in a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
}

impl AttributeType {
    /// Short type tag as DynamoDB writes it.
    pub fn tag(&self) -> &'static str {
        match self {
            AttributeType::String => "S",
            AttributeType::Number => "N",
        }
    }
}

/// Billing mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
}

impl TableConfig {
    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }
}

/// Returns the canonical table configuration for the movies table.
/// This is a pure function - no I/O.
pub fn movies_table_config() -> TableConfig {
    TableConfig {
        table_name: "Movies".to_string(),
        partition_key: KeyAttribute {
            name: PARTITION_KEY.to_string(),
            attribute_type: AttributeType::String,
        },
        sort_key: Some(KeyAttribute {
            name: SORT_KEY.to_string(),
            attribute_type: AttributeType::Number,
        }),
        billing_mode: BillingMode::PayPerRequest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movies_table_keys_match_repository_keys() {
        let config = movies_table_config();

        assert_eq!(config.partition_key.name, "title");
        assert_eq!(config.partition_key.attribute_type, AttributeType::String);
        assert_eq!(
            config.sort_key,
            Some(KeyAttribute {
                name: "year".to_string(),
                attribute_type: AttributeType::Number,
            })
        );
    }

    #[test]
    fn test_with_table_name() {
        assert_eq!(
            movies_table_config().with_table_name("Films").table_name,
            "Films"
        );
    }
}
