//! Typed movie repository on top of an injected [`StoreGateway`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;

use crate::movie::{validate_movie, Movie};

use super::codec::{decode, encode};
use super::error::{RepositoryError, Result};
use super::keys::derive_key;
use super::traits::StoreGateway;
use super::update::UpdateSpec;

const ENTITY_TYPE: &str = "Movie";

/// Default deadline attached to every gateway call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of a full table scan.
///
/// Items that fail to decode are skipped and counted rather than failing
/// the whole scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    pub movies: Vec<Movie>,
    pub skipped: usize,
}

/// Movie repository.
///
/// Composes the codec and key derivation with a gateway. Cheap to clone.
#[derive(Clone)]
pub struct MovieRepository {
    gateway: Arc<dyn StoreGateway>,
    table_name: String,
    call_timeout: Duration,
}

impl MovieRepository {
    /// Creates a repository over `gateway` for the given table.
    pub fn new(gateway: Arc<dyn StoreGateway>, table_name: impl Into<String>) -> Self {
        Self {
            gateway,
            table_name: table_name.into(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Sets the deadline applied to each gateway call.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Writes a movie, replacing any existing movie with the same key.
    pub async fn save(&self, movie: &Movie) -> Result<()> {
        validate_movie(movie)?;
        let item = encode(movie);

        self.with_deadline(self.gateway.put(&self.table_name, item))
            .await??;

        tracing::debug!(title = %movie.title, year = movie.year, "Saved movie");
        Ok(())
    }

    /// Reads one movie.
    pub async fn get_one(&self, title: &str, year: i64) -> Result<Movie> {
        let key = derive_key(title, year)?;

        let item = self
            .with_deadline(self.gateway.get(&self.table_name, &key))
            .await??
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: ENTITY_TYPE,
                id: key.to_string(),
            })?;

        decode(&item)
    }

    /// Reads every movie in the table.
    ///
    /// Malformed items, whether the gateway or the codec rejects them, are
    /// logged and skipped. A store failure part-way through aborts the scan
    /// with that error.
    pub async fn scan_all(&self) -> Result<ScanOutcome> {
        let mut stream = self.gateway.scan(&self.table_name);
        let mut outcome = ScanOutcome::default();

        while let Some(next) = self.with_deadline(stream.next()).await? {
            match next.and_then(|item| decode(&item)) {
                Ok(movie) => outcome.movies.push(movie),
                Err(err @ RepositoryError::Decode(_)) => {
                    tracing::warn!(error = %err, "Skipping malformed movie item");
                    outcome.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        if outcome.skipped > 0 {
            tracing::warn!(
                skipped = outcome.skipped,
                returned = outcome.movies.len(),
                "Scan skipped malformed items"
            );
        }

        Ok(outcome)
    }

    /// Deletes one movie. Deleting a movie that does not exist succeeds.
    pub async fn delete_one(&self, title: &str, year: i64) -> Result<()> {
        let key = derive_key(title, year)?;

        self.with_deadline(self.gateway.delete(&self.table_name, &key))
            .await??;

        tracing::debug!(%key, "Deleted movie");
        Ok(())
    }

    /// Applies a partial update to one movie.
    pub async fn update_one(&self, title: &str, year: i64, spec: &UpdateSpec) -> Result<()> {
        let key = derive_key(title, year)?;

        self.with_deadline(self.gateway.update(&self.table_name, &key, spec))
            .await??;

        tracing::debug!(%key, expression = spec.expression(), "Updated movie");
        Ok(())
    }

    /// Probes the gateway.
    pub async fn health_check(&self) -> Result<()> {
        self.with_deadline(self.gateway.health_check(&self.table_name))
            .await?
    }

    async fn with_deadline<F: Future>(&self, fut: F) -> Result<F::Output> {
        tokio::time::timeout(self.call_timeout, fut)
            .await
            .map_err(|_| RepositoryError::Timeout(self.call_timeout))
    }
}
