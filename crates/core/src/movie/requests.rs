//! API request types for movie operations.
//!
//! These mirror the JSON bodies accepted by the HTTP service. The optional
//! `tableName` field is accepted for compatibility with older clients and
//! ignored: the table is fixed by server configuration.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::storage::{info_to_attribute, RepositoryError, UpdateSpec};

use super::operations::validate_title;
use super::types::InfoValue;

/// Request payload identifying a single movie (get / delete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieKeyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    pub title: String,
    pub year: i64,
}

impl MovieKeyRequest {
    pub fn new(title: impl Into<String>, year: i64) -> Self {
        Self {
            table_name: None,
            title: title.into(),
            year,
        }
    }

    /// Checks the key fields before they reach the repository.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        validate_title(&self.title)?;
        Ok(())
    }
}

/// Request payload for a partial update of a movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    pub title: String,
    pub year: i64,
    pub update_expression: String,
    #[serde(default, alias = "values")]
    pub expression_attribute_values: BTreeMap<String, InfoValue>,
}

impl UpdateMovieRequest {
    pub fn new(title: impl Into<String>, year: i64, update_expression: impl Into<String>) -> Self {
        Self {
            table_name: None,
            title: title.into(),
            year,
            update_expression: update_expression.into(),
            expression_attribute_values: BTreeMap::new(),
        }
    }

    /// Binds a placeholder value.
    pub fn with_value(mut self, placeholder: impl Into<String>, value: impl Into<InfoValue>) -> Self {
        self.expression_attribute_values
            .insert(placeholder.into(), value.into());
        self
    }

    /// Validates the key and builds the [`UpdateSpec`].
    ///
    /// Fails with `Condition` when the expression references a placeholder
    /// that has no value, so nothing reaches the store.
    pub fn to_update_spec(&self) -> Result<UpdateSpec, RepositoryError> {
        validate_title(&self.title)?;

        let values: HashMap<_, _> = self
            .expression_attribute_values
            .iter()
            .map(|(name, value)| (name.clone(), info_to_attribute(value)))
            .collect();

        UpdateSpec::new(self.update_expression.clone(), values)
    }
}
