//! Pure functions for calculating deployment plans (Functional Core).

use super::config::{KeyAttribute, TableConfig};

/// Represents the current state of a table.
#[derive(Debug, Clone)]
pub struct TableState {
    pub status: TableStatus,
    pub partition_key: Option<KeyAttribute>,
    pub sort_key: Option<KeyAttribute>,
    pub item_count: Option<i64>,
}

/// Table status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Active,
    Creating,
    Updating,
    Deleting,
}

/// Planned changes for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployPlan {
    /// Table doesn't exist, needs to be created.
    CreateTable { config: TableConfig },
    /// Table exists with a different primary key. Key schemas cannot be
    /// changed in place.
    KeyMismatch {
        table_name: String,
        expected: String,
        found: String,
    },
    /// Table is up to date, no changes needed.
    NoChanges { table_name: String },
}

/// Plan for destroying a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyPlan {
    /// Table exists and will be deleted.
    DeleteTable {
        table_name: String,
        item_count: Option<i64>,
    },
    /// Table doesn't exist, nothing to do.
    AlreadyGone { table_name: String },
}

/// Pure function: Calculate what changes are needed to reach desired state.
pub fn calculate_deploy_plan(current: Option<&TableState>, desired: &TableConfig) -> DeployPlan {
    let Some(state) = current else {
        return DeployPlan::CreateTable {
            config: desired.clone(),
        };
    };

    let matches = state.partition_key.as_ref() == Some(&desired.partition_key)
        && state.sort_key == desired.sort_key;

    if matches {
        DeployPlan::NoChanges {
            table_name: desired.table_name.clone(),
        }
    } else {
        DeployPlan::KeyMismatch {
            table_name: desired.table_name.clone(),
            expected: describe_key(Some(&desired.partition_key), desired.sort_key.as_ref()),
            found: describe_key(state.partition_key.as_ref(), state.sort_key.as_ref()),
        }
    }
}

/// Pure function: Calculate destroy plan.
pub fn calculate_destroy_plan(current: Option<&TableState>, table_name: &str) -> DestroyPlan {
    match current {
        Some(state) => DestroyPlan::DeleteTable {
            table_name: table_name.to_string(),
            item_count: state.item_count,
        },
        None => DestroyPlan::AlreadyGone {
            table_name: table_name.to_string(),
        },
    }
}

/// Pure function: Format a deploy plan for display.
pub fn format_deploy_plan(plan: &DeployPlan) -> Vec<String> {
    match plan {
        DeployPlan::CreateTable { config } => {
            let mut lines = vec![
                format!("+ Create table: {}", config.table_name),
                format!(
                    "  Partition key: {} ({})",
                    config.partition_key.name,
                    config.partition_key.attribute_type.tag()
                ),
            ];
            if let Some(sk) = &config.sort_key {
                lines.push(format!(
                    "  Sort key: {} ({})",
                    sk.name,
                    sk.attribute_type.tag()
                ));
            }
            lines.push("  Billing: PAY_PER_REQUEST".to_string());
            lines
        }
        DeployPlan::KeyMismatch {
            table_name,
            expected,
            found,
        } => vec![
            format!("~ Table '{}' has an incompatible key schema", table_name),
            format!("  Expected: {}", expected),
            format!("  Found: {}", found),
            "  Destroy the table first with --destroy".to_string(),
        ],
        DeployPlan::NoChanges { table_name } => {
            vec![format!("= Table '{}' is up to date", table_name)]
        }
    }
}

/// Pure function: Format a destroy plan for display.
pub fn format_destroy_plan(plan: &DestroyPlan) -> Vec<String> {
    match plan {
        DestroyPlan::DeleteTable {
            table_name,
            item_count,
        } => {
            let items = item_count
                .map(|n| format!("about {} items", n))
                .unwrap_or_else(|| "unknown item count".to_string());
            vec![format!(
                "- Delete table: {} ({}, ALL DATA WILL BE LOST)",
                table_name, items
            )]
        }
        DestroyPlan::AlreadyGone { table_name } => {
            vec![format!("= Table '{}' does not exist", table_name)]
        }
    }
}

fn describe_key(partition: Option<&KeyAttribute>, sort: Option<&KeyAttribute>) -> String {
    let render = |key: Option<&KeyAttribute>| match key {
        Some(k) => format!("{} ({})", k.name, k.attribute_type.tag()),
        None => "none".to_string(),
    };
    format!("partition {}, sort {}", render(partition), render(sort))
}
