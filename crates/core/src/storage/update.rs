//! Update specifications: an update expression plus its placeholder values.

use std::collections::{BTreeSet, HashMap};

use super::error::{RepositoryError, Result};
use super::types::AttributeValue;

/// An update expression template with its bound placeholder values.
///
/// Construction checks that every `:placeholder` in the expression has a
/// value and every value is referenced, so a malformed spec never reaches
/// the store.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSpec {
    expression: String,
    values: HashMap<String, AttributeValue>,
}

impl UpdateSpec {
    pub fn new(
        expression: impl Into<String>,
        values: HashMap<String, AttributeValue>,
    ) -> Result<Self> {
        let expression = expression.into();
        if expression.trim().is_empty() {
            return Err(RepositoryError::Condition(
                "Update expression cannot be empty".to_string(),
            ));
        }

        let referenced = placeholders(&expression);

        let missing: Vec<&str> = referenced
            .iter()
            .filter(|p| !values.contains_key(**p))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(RepositoryError::Condition(format!(
                "Unresolved placeholder(s) in update expression: {}",
                missing.join(", ")
            )));
        }

        let mut unused: Vec<&str> = values
            .keys()
            .map(String::as_str)
            .filter(|k| !referenced.contains(k))
            .collect();
        if !unused.is_empty() {
            unused.sort_unstable();
            return Err(RepositoryError::Condition(format!(
                "Value(s) provided but unused in update expression: {}",
                unused.join(", ")
            )));
        }

        Ok(Self { expression, values })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn values(&self) -> &HashMap<String, AttributeValue> {
        &self.values
    }
}

/// Collect the `:name` placeholders referenced by an expression.
pub fn placeholders(expression: &str) -> BTreeSet<&str> {
    let mut found = BTreeSet::new();
    let bytes = expression.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b':' {
            let start = i;
            i += 1;
            while i < bytes.len() && is_name_byte(bytes[i]) {
                i += 1;
            }
            if i > start + 1 {
                found.insert(&expression[start..i]);
            }
        } else {
            i += 1;
        }
    }

    found
}

pub(crate) fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
