//! In-memory gateway implementation.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use moviestore_core::storage::{
    is_key_attribute, AttributeValue, Item, ItemStream, Key, RepositoryError, Result,
    StoreGateway, UpdateExpression, UpdateSpec, PARTITION_KEY, SORT_KEY,
};

/// Default number of items returned per scan page.
const DEFAULT_PAGE_SIZE: usize = 100;

/// Ordering key of an item within a table: partition value, then sort value.
type TableKey = (String, String);

type Table = BTreeMap<TableKey, Item>;

/// In-memory store gateway.
///
/// Mirrors the behavior of the hosted store where it matters to callers:
/// puts replace, deletes are idempotent, updates upsert and may not touch
/// key attributes, and scans are paginated.
#[derive(Debug, Clone)]
pub struct InMemoryGateway {
    tables: Arc<RwLock<HashMap<String, Table>>>,
    page_size: usize,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    /// Creates a new gateway with no tables.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the number of items fetched per scan page.
    #[allow(dead_code)]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Reads the next page of a scan, starting after `after`.
    async fn scan_page(&self, table: &str, after: Option<&TableKey>) -> Vec<(TableKey, Item)> {
        let tables = self.tables.read().await;
        let Some(items) = tables.get(table) else {
            return Vec::new();
        };

        let lower = match after {
            Some(key) => Bound::Excluded(key.clone()),
            None => Bound::Unbounded,
        };

        items
            .range((lower, Bound::Unbounded))
            .take(self.page_size)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[async_trait]
impl StoreGateway for InMemoryGateway {
    async fn get(&self, table: &str, key: &Key) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|items| items.get(&table_key(key)))
            .cloned())
    }

    async fn put(&self, table: &str, item: Item) -> Result<()> {
        let key = item_table_key(&item)?;
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().insert(key, item);
        Ok(())
    }

    async fn update(&self, table: &str, key: &Key, spec: &UpdateSpec) -> Result<()> {
        let expression = UpdateExpression::parse(spec.expression())?;

        if let Some(name) = expression.target_roots().find(|root| is_key_attribute(root)) {
            return Err(RepositoryError::Condition(format!(
                "Cannot update attribute {name}. This attribute is part of the key"
            )));
        }

        let mut tables = self.tables.write().await;
        let items = tables.entry(table.to_string()).or_default();
        let table_key = table_key(key);

        let mut item = items
            .get(&table_key)
            .cloned()
            .unwrap_or_else(|| key.to_item());
        expression.apply(&mut item, spec.values())?;

        items.insert(table_key, item);
        Ok(())
    }

    async fn delete(&self, table: &str, key: &Key) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(items) = tables.get_mut(table) {
            items.remove(&table_key(key));
        }
        Ok(())
    }

    fn scan<'a>(&'a self, table: &'a str) -> ItemStream<'a> {
        Box::pin(async_stream::stream! {
            let mut last_key: Option<TableKey> = None;

            loop {
                let page = self.scan_page(table, last_key.as_ref()).await;
                let exhausted = page.len() < self.page_size;

                for (key, item) in page {
                    last_key = Some(key);
                    yield Ok::<Item, RepositoryError>(item);
                }

                if exhausted {
                    break;
                }
            }
        })
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn key_part(value: &AttributeValue) -> String {
    match value {
        AttributeValue::S(s) | AttributeValue::N(s) => s.clone(),
        other => format!("<{}>", other.type_name()),
    }
}

fn table_key(key: &Key) -> TableKey {
    (key_part(&key.partition.value), key_part(&key.sort.value))
}

fn item_table_key(item: &Item) -> Result<TableKey> {
    let part = |name: &str| {
        item.get(name).map(key_part).ok_or_else(|| {
            RepositoryError::Store(format!(
                "One or more parameter values were invalid: Missing the key {name} in the item"
            ))
        })
    };

    Ok((part(PARTITION_KEY)?, part(SORT_KEY)?))
}

#[cfg(test)]
mod tests {
    use futures_util::TryStreamExt;
    use moviestore_core::movie::Movie;
    use moviestore_core::storage::{derive_key, encode};

    use super::*;

    const TABLE: &str = "Movies";

    fn number(n: &str) -> AttributeValue {
        AttributeValue::N(n.to_string())
    }

    fn spec(expression: &str, values: &[(&str, AttributeValue)]) -> UpdateSpec {
        let values = values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        UpdateSpec::new(expression, values).unwrap()
    }

    async fn seeded(count: i64) -> InMemoryGateway {
        let gateway = InMemoryGateway::new().with_page_size(2);
        for year in 0..count {
            gateway
                .put(TABLE, encode(&Movie::new("Film", 2000 + year)))
                .await
                .unwrap();
        }
        gateway
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let gateway = InMemoryGateway::new();
        let item = encode(&Movie::new("Heat", 1995).with_info("genre", "crime"));

        gateway.put(TABLE, item.clone()).await.unwrap();

        let key = derive_key("Heat", 1995).unwrap();
        assert_eq!(gateway.get(TABLE, &key).await.unwrap(), Some(item));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let gateway = InMemoryGateway::new();
        let key = derive_key("Heat", 1995).unwrap();

        assert_eq!(gateway.get(TABLE, &key).await.unwrap(), None);
        assert_eq!(gateway.get("Other", &key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_replaces_whole_item() {
        let gateway = InMemoryGateway::new();
        gateway
            .put(TABLE, encode(&Movie::new("Heat", 1995).with_info("genre", "crime")))
            .await
            .unwrap();
        gateway
            .put(TABLE, encode(&Movie::new("Heat", 1995)))
            .await
            .unwrap();

        let key = derive_key("Heat", 1995).unwrap();
        let item = gateway.get(TABLE, &key).await.unwrap().unwrap();
        assert!(item.get("info").unwrap().as_m().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_without_key_fails() {
        let gateway = InMemoryGateway::new();
        let mut item = encode(&Movie::new("Heat", 1995));
        item.remove("year");

        assert!(matches!(
            gateway.put(TABLE, item).await,
            Err(RepositoryError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let gateway = seeded(1).await;
        let key = derive_key("Film", 2000).unwrap();

        gateway.delete(TABLE, &key).await.unwrap();
        gateway.delete(TABLE, &key).await.unwrap();
        gateway.delete("Other", &key).await.unwrap();

        assert_eq!(gateway.get(TABLE, &key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_sets_nested_attribute() {
        let gateway = seeded(1).await;
        let key = derive_key("Film", 2000).unwrap();

        gateway
            .update(TABLE, &key, &spec("SET info.rating = :r", &[(":r", number("7"))]))
            .await
            .unwrap();

        let item = gateway.get(TABLE, &key).await.unwrap().unwrap();
        assert_eq!(
            item.get("info").unwrap().as_m().unwrap().get("rating"),
            Some(&number("7"))
        );
    }

    #[tokio::test]
    async fn test_update_missing_item_upserts() {
        let gateway = InMemoryGateway::new();
        let key = derive_key("Heat", 1995).unwrap();

        gateway
            .update(TABLE, &key, &spec("SET rating = :r", &[(":r", number("9"))]))
            .await
            .unwrap();

        let item = gateway.get(TABLE, &key).await.unwrap().unwrap();
        assert!(key.matches(&item));
        assert_eq!(item.get("rating"), Some(&number("9")));
    }

    #[tokio::test]
    async fn test_update_key_attribute_rejected() {
        let gateway = seeded(1).await;
        let key = derive_key("Film", 2000).unwrap();

        let err = gateway
            .update(TABLE, &key, &spec("SET #y = :y", &[(":y", number("2001"))]))
            .await;
        assert!(matches!(err, Err(RepositoryError::Condition(_))));

        let err = gateway
            .update(TABLE, &key, &spec("SET year = :y", &[(":y", number("2001"))]))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::Condition(
                "Cannot update attribute year. This attribute is part of the key".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_failed_update_leaves_item_untouched() {
        let gateway = seeded(1).await;
        let key = derive_key("Film", 2000).unwrap();
        let before = gateway.get(TABLE, &key).await.unwrap();

        let result = gateway
            .update(
                TABLE,
                &key,
                &spec("SET info.rating = info.missing + :one", &[(":one", number("1"))]),
            )
            .await;

        assert!(matches!(result, Err(RepositoryError::Condition(_))));
        assert_eq!(gateway.get(TABLE, &key).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_scan_yields_every_item_once_across_pages() {
        let gateway = seeded(5).await;

        let items: Vec<Item> = gateway.scan(TABLE).try_collect().await.unwrap();

        let mut years: Vec<&str> = items
            .iter()
            .map(|item| item.get("year").unwrap().as_n().unwrap())
            .collect();
        years.sort_unstable();
        assert_eq!(years, vec!["2000", "2001", "2002", "2003", "2004"]);
    }

    #[tokio::test]
    async fn test_scan_page_boundary() {
        let gateway = seeded(4).await;

        let items: Vec<Item> = gateway.scan(TABLE).try_collect().await.unwrap();
        assert_eq!(items.len(), 4);
    }

    #[tokio::test]
    async fn test_scan_restarts_each_call() {
        let gateway = seeded(3).await;

        let first: Vec<Item> = gateway.scan(TABLE).try_collect().await.unwrap();
        let second: Vec<Item> = gateway.scan(TABLE).try_collect().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_scan_missing_table_is_empty() {
        let gateway = InMemoryGateway::new();

        let items: Vec<Item> = gateway.scan(TABLE).try_collect().await.unwrap();
        assert!(items.is_empty());
    }
}
