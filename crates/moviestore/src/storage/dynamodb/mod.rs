//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of the `StoreGateway`
//! trait using `aws-sdk-dynamodb`.

mod error;
mod gateway;

pub use gateway::DynamoDbGateway;
