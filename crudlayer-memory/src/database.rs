//! In-memory database backend.
//!
//! [`InMemoryDatabase`] keeps its collections in a sorted map, so discovery yields names in a
//! stable order. It can be switched offline to exercise health-check and discovery failures,
//! and its builder can simulate a slow or failing connection.

use async_trait::async_trait;
use mea::rwlock::RwLock;
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tokio::time::sleep;

use crudlayer_core::{
    backend::{DatabaseBackend, DatabaseBackendBuilder},
    context::OpContext,
    error::{CrudError, CrudResult},
    handle::CollectionHandle,
};

use crate::collection::InMemoryCollection;

#[derive(Debug, Default)]
struct DatabaseState {
    collections: BTreeMap<String, InMemoryCollection>,
    offline: bool,
}

/// Thread-safe in-memory database.
///
/// Clones share the same collections.
///
/// # Example
///
/// ```ignore
/// use crudlayer_memory::InMemoryDatabase;
///
/// let database = InMemoryDatabase::new();
/// let users = database.collection("users").await;
/// assert!(users.is_empty().await);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    state: Arc<RwLock<DatabaseState>>,
}

impl InMemoryDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(DatabaseState::default())),
        }
    }

    pub fn builder() -> InMemoryDatabaseBuilder {
        InMemoryDatabaseBuilder::default()
    }

    /// Returns the collection `name`, creating it empty if it does not exist yet.
    pub async fn collection(&self, name: &str) -> InMemoryCollection {
        self.state
            .write()
            .await
            .collections
            .entry(name.to_string())
            .or_insert_with(|| InMemoryCollection::new(name))
            .clone()
    }

    /// Removes the collection `name` and its documents.
    ///
    /// # Errors
    ///
    /// [`CrudError::CollectionNotFound`] if there is no such collection.
    pub async fn drop_collection(&self, name: &str) -> CrudResult<()> {
        match self.state.write().await.collections.remove(name) {
            Some(_) => Ok(()),
            None => Err(CrudError::CollectionNotFound(name.to_string())),
        }
    }

    /// While offline, pings and collection listing fail with a backend error.
    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    async fn ensure_online(&self) -> CrudResult<()> {
        if self.state.read().await.offline {
            return Err(CrudError::Backend("database unreachable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseBackend for InMemoryDatabase {
    async fn ping(&self, _ctx: &OpContext) -> CrudResult<()> {
        self.ensure_online().await
    }

    async fn list_collection_names(&self, _ctx: &OpContext) -> CrudResult<Vec<String>> {
        self.ensure_online().await?;

        Ok(self
            .state
            .read()
            .await
            .collections
            .keys()
            .cloned()
            .collect())
    }

    async fn collection_handle(&self, name: &str) -> Arc<dyn CollectionHandle> {
        Arc::new(self.collection(name).await)
    }
}

/// Builder for [`InMemoryDatabase`].
///
/// Beyond pre-creating collections, it can stand in for an unreachable or slow server when
/// testing client bootstrap.
#[derive(Debug, Default)]
pub struct InMemoryDatabaseBuilder {
    database: InMemoryDatabase,
    collections: Vec<String>,
    connect_latency: Option<Duration>,
    connect_error: Option<String>,
    offline: bool,
}

impl InMemoryDatabaseBuilder {
    /// Builds on top of an existing database instead of a fresh one.
    pub fn with_database(mut self, database: InMemoryDatabase) -> Self {
        self.database = database;
        self
    }

    /// Creates the collection `name` when built.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collections.push(name.into());
        self
    }

    /// Delays `build` by `latency`.
    pub fn connect_latency(mut self, latency: Duration) -> Self {
        self.connect_latency = Some(latency);
        self
    }

    /// Makes `build` fail with an initialization error carrying `message`.
    pub fn connect_error(mut self, message: impl Into<String>) -> Self {
        self.connect_error = Some(message.into());
        self
    }

    /// Builds the database already offline.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

#[async_trait]
impl DatabaseBackendBuilder for InMemoryDatabaseBuilder {
    type Backend = InMemoryDatabase;

    async fn build(self) -> CrudResult<Self::Backend> {
        if let Some(latency) = self.connect_latency {
            sleep(latency).await;
        }
        if let Some(message) = self.connect_error {
            return Err(CrudError::Initialization(message));
        }

        for name in &self.collections {
            self.database.collection(name).await;
        }
        self.database.set_offline(self.offline).await;

        Ok(self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collections_listed_in_order() {
        let database = InMemoryDatabase::builder()
            .collection("users")
            .collection("orders")
            .build()
            .await
            .unwrap();
        let ctx = OpContext::background();

        assert_eq!(
            database.list_collection_names(&ctx).await.unwrap(),
            vec!["orders".to_string(), "users".to_string()]
        );

        database.drop_collection("orders").await.unwrap();
        assert_eq!(
            database.drop_collection("orders").await,
            Err(CrudError::CollectionNotFound("orders".into()))
        );
    }

    #[tokio::test]
    async fn collection_handles_share_state() {
        let database = InMemoryDatabase::new();
        let first = database.collection("users").await;
        let second = database.collection("users").await;

        first.seed([bson::doc! { "_id": 1 }]).await;
        assert_eq!(second.len().await, 1);
    }

    #[tokio::test]
    async fn offline_database_fails_ping_and_listing() {
        let database = InMemoryDatabase::builder().offline(true).build().await.unwrap();
        let ctx = OpContext::background();

        assert!(database.ping(&ctx).await.is_err());
        assert!(database.list_collection_names(&ctx).await.is_err());

        database.set_offline(false).await;
        assert!(database.ping(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn connect_error_fails_build() {
        let result = InMemoryDatabase::builder()
            .connect_error("no route to host")
            .build()
            .await;

        assert_eq!(
            result.unwrap_err(),
            CrudError::Initialization("no route to host".into())
        );
    }
}
