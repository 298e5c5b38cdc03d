//! Database-level backend abstraction used by the [`Client`](crate::client::Client).
//!
//! Where [`CollectionHandle`] covers a single collection, [`DatabaseBackend`] covers the
//! database a client is bound to: liveness checks, collection discovery and handing out
//! collection handles by name.
//!
//! # Traits
//!
//! - [`DatabaseBackend`]: a connected database
//! - [`DatabaseBackendBuilder`]: factory that opens the connection

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{context::OpContext, error::CrudResult, handle::CollectionHandle};

/// A connected database.
///
/// Implementations must be safe for concurrent use by multiple callers.
#[async_trait]
pub trait DatabaseBackend: Send + Sync + Debug {
    /// Checks that the primary is reachable.
    async fn ping(&self, ctx: &OpContext) -> CrudResult<()>;

    /// Lists the names of the collections that currently exist in the database.
    async fn list_collection_names(&self, ctx: &OpContext) -> CrudResult<Vec<String>>;

    /// Returns a handle to the collection `name`. The collection need not exist yet.
    async fn collection_handle(&self, name: &str) -> Arc<dyn CollectionHandle>;

    /// Closes the connection, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> CrudResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Factory that opens a [`DatabaseBackend`].
#[async_trait]
pub trait DatabaseBackendBuilder {
    type Backend: DatabaseBackend;

    async fn build(self) -> CrudResult<Self::Backend>;
}
