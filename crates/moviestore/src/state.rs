//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. The store backend behind the repository is selected at
//! compile time via feature flags.

use std::sync::Arc;

use moviestore_core::storage::{MovieRepository, StoreGateway};

use crate::config::Config;

/// Shared application state.
///
/// Cloned for each request handler. The repository is the only shared
/// resource and holds the gateway handle.
#[derive(Clone)]
pub struct AppState {
    pub movie_repo: Arc<MovieRepository>,
}

impl AppState {
    /// Creates an AppState over the given gateway and configuration.
    pub fn from_gateway(gateway: Arc<dyn StoreGateway>, config: &Config) -> Self {
        let repo = MovieRepository::new(gateway, config.table_name.clone())
            .with_call_timeout(config.store_timeout());

        Self {
            movie_repo: Arc::new(repo),
        }
    }
}

// ============================================================================
// Factory functions for the different backends
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory_backend {
    use super::*;
    use crate::storage::InMemoryGateway;

    impl AppState {
        /// Creates AppState with in-memory storage.
        /// Useful for development without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let gateway = Arc::new(InMemoryGateway::new());
            tracing::info!("Using in-memory store");

            Ok(Self::from_gateway(gateway, config))
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb_backend {
    use super::*;
    use crate::storage::DynamoDbGateway;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()));

            if let Some(endpoint) = &config.aws_endpoint_url {
                loader = loader.endpoint_url(endpoint);
            }

            let sdk_config = loader.load().await;
            let client = aws_sdk_dynamodb::Client::new(&sdk_config);

            tracing::info!(
                region = %config.aws_region,
                endpoint = config.aws_endpoint_url.as_deref().unwrap_or("default"),
                "Using DynamoDB store"
            );

            Ok(Self::from_gateway(
                Arc::new(DynamoDbGateway::new(client)),
                config,
            ))
        }
    }
}

// ============================================================================
// Test support - provides Default implementation for unit tests
// ============================================================================
