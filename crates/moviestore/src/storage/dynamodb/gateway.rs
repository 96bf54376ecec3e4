//! DynamoDB gateway implementation.
//!
//! Implements `StoreGateway` from `moviestore_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use moviestore_core::storage::sdk::{item_from_sdk, item_to_sdk, key_to_sdk, value_to_sdk, SdkItem};
use moviestore_core::storage::{Item, ItemStream, Key, Result, StoreGateway, UpdateSpec};

use super::error::{
    map_delete_item_error, map_describe_table_error, map_get_item_error, map_put_item_error,
    map_scan_error, map_update_item_error,
};

/// DynamoDB-based gateway.
///
/// The SDK client is cheap to clone and safe for concurrent use.
pub struct DynamoDbGateway {
    client: Client,
}

impl DynamoDbGateway {
    /// Creates a new gateway with the given DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StoreGateway for DynamoDbGateway {
    async fn get(&self, table: &str, key: &Key) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key_to_sdk(key)))
            .consistent_read(true)
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_from_sdk(&item)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, table: &str, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item_to_sdk(&item)))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn update(&self, table: &str, key: &Key, spec: &UpdateSpec) -> Result<()> {
        // The store rejects an empty ExpressionAttributeValues map.
        let values: Option<SdkItem> = if spec.values().is_empty() {
            None
        } else {
            Some(
                spec.values()
                    .iter()
                    .map(|(name, value)| (name.clone(), value_to_sdk(value)))
                    .collect(),
            )
        };

        self.client
            .update_item()
            .table_name(table)
            .set_key(Some(key_to_sdk(key)))
            .update_expression(spec.expression())
            .set_expression_attribute_values(values)
            .send()
            .await
            .map_err(map_update_item_error)?;

        Ok(())
    }

    async fn delete(&self, table: &str, key: &Key) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(key_to_sdk(key)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }

    fn scan<'a>(&'a self, table: &'a str) -> ItemStream<'a> {
        Box::pin(async_stream::stream! {
            let mut exclusive_start_key: Option<SdkItem> = None;
            let mut page = 0usize;

            loop {
                let output = match self
                    .client
                    .scan()
                    .table_name(table)
                    .set_exclusive_start_key(exclusive_start_key.take())
                    .send()
                    .await
                {
                    Ok(output) => output,
                    Err(err) => {
                        yield Err(map_scan_error(err));
                        break;
                    }
                };

                page += 1;
                let items = output.items.unwrap_or_default();
                tracing::debug!(table, page, count = items.len(), "Scanned page");

                // Conversion failures are per item; the scan continues.
                for item in &items {
                    yield item_from_sdk(item);
                }

                match output.last_evaluated_key {
                    Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                    _ => break,
                }
            }
        })
    }

    async fn health_check(&self, table: &str) -> Result<()> {
        self.client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(map_describe_table_error)?;

        Ok(())
    }
}
