use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::{Item, Key, Result, UpdateSpec};

/// Lazy sequence of items produced by a table scan.
pub type ItemStream<'a> = BoxStream<'a, Result<Item>>;

/// Primitive operations against an external table store.
///
/// Implementations hold a connection handle that is safe for concurrent
/// use; they do not retry.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Reads one item. Absence is `Ok(None)`.
    async fn get(&self, table: &str, key: &Key) -> Result<Option<Item>>;

    /// Writes a whole item, replacing any item with the same key.
    async fn put(&self, table: &str, item: Item) -> Result<()>;

    /// Applies an update expression to one item.
    async fn update(&self, table: &str, key: &Key, spec: &UpdateSpec) -> Result<()>;

    /// Deletes one item. Deleting an absent key succeeds.
    async fn delete(&self, table: &str, key: &Key) -> Result<()>;

    /// Streams every item in the table, following pagination internally.
    ///
    /// Each call starts a fresh scan. A `Decode` error concerns a single
    /// item and may be followed by more items; any other error ends the
    /// stream.
    fn scan<'a>(&'a self, table: &'a str) -> ItemStream<'a>;

    /// Checks that the store is reachable and the table exists.
    async fn health_check(&self, _table: &str) -> Result<()> {
        Ok(())
    }
}
