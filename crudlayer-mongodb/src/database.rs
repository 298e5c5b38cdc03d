use async_trait::async_trait;
use bson::{Document, doc};
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, ReadPreference, SelectionCriteria},
};
use std::sync::Arc;

use crudlayer_core::{
    backend::{DatabaseBackend, DatabaseBackendBuilder},
    config::DatabaseConfig,
    context::OpContext,
    error::{CrudError, CrudResult},
    handle::CollectionHandle,
};

use crate::handle::MongoCollectionHandle;

#[derive(Debug)]
pub struct MongoDatabase {
    client: Client,
    database: String,
}

impl MongoDatabase {
    pub fn new(client: Client, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }

    pub fn builder(uri: &str, database: &str) -> MongoDbBuilder {
        MongoDbBuilder::new(uri, database)
    }

    /// The underlying driver client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }

    fn get_collection(&self, name: &str) -> MongoCollection<Document> {
        self.client.database(&self.database).collection(name)
    }
}

#[async_trait]
impl DatabaseBackend for MongoDatabase {
    async fn ping(&self, _ctx: &OpContext) -> CrudResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
            .await
            .map_err(|e| CrudError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list_collection_names(&self, _ctx: &OpContext) -> CrudResult<Vec<String>> {
        self.client
            .database(&self.database)
            .list_collection_names()
            .await
            .map_err(|e| CrudError::Backend(e.to_string()))
    }

    async fn collection_handle(&self, name: &str) -> Arc<dyn CollectionHandle> {
        Arc::new(MongoCollectionHandle::new(self.get_collection(name)))
    }

    async fn shutdown(self) -> CrudResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

/// Opens a [`MongoDatabase`] from a connection URI.
///
/// Parsing the URI and creating the driver client do not contact the server; the first
/// round-trip happens when the client discovers collections or pings.
#[derive(Debug, Clone)]
pub struct MongoDbBuilder {
    uri: String,
    database: String,
}

impl MongoDbBuilder {
    pub fn new(uri: &str, database: &str) -> Self {
        Self {
            uri: uri.to_string(),
            database: database.to_string(),
        }
    }

    /// Builds the connection URI from `config`.
    ///
    /// # Errors
    ///
    /// [`CrudError::Configuration`] if the settings are incomplete or contain characters that
    /// would corrupt the URI.
    pub fn from_config(config: &DatabaseConfig) -> CrudResult<Self> {
        config.validate()?;

        Ok(Self::new(&config.connection_uri(), &config.database))
    }
}

#[async_trait]
impl DatabaseBackendBuilder for MongoDbBuilder {
    type Backend = MongoDatabase;

    async fn build(self) -> CrudResult<Self::Backend> {
        Ok(MongoDatabase::new(
            Client::with_options(
                ClientOptions::parse(&self.uri)
                    .await
                    .map_err(|e| CrudError::Initialization(e.to_string()))?,
            )
            .map_err(|e| CrudError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
