//! Client owning a database connection and its registry of collections.
//!
//! A [`Client`] is built once, either by [`Client::bootstrap`] (open the connection, then
//! discover existing collections) or by [`Client::new`] over an already connected backend. Callers
//! then look collections up by name and run CRUD operations on them directly.
//!
//! The registry only changes through `&mut Client` ([`Client::add_collections`],
//! [`Client::refresh_collections`]), so registration and lookup cannot race.
//!
//! # Example
//!
//! ```ignore
//! use crudlayer::{prelude::*, mongodb::MongoDbBuilder};
//!
//! let config = DatabaseConfig::from_env("APP_DB")?;
//! let client = Client::bootstrap(MongoDbBuilder::from_config(&config)?).await?;
//!
//! client.ping().await?;
//! let users = client.collection("users")?;
//! ```

use tracing::{Instrument, Span, debug, error, info, info_span, warn};

use crate::{
    backend::{DatabaseBackend, DatabaseBackendBuilder},
    collection::Collection,
    context::{CONNECT_TIMEOUT, OpContext},
    error::{CrudError, CrudResult},
};

/// A connected database plus the collections registered on it.
#[derive(Debug)]
pub struct Client<B: DatabaseBackend> {
    backend: B,
    collections: Vec<Collection>,
    span: Span,
}

impl<B: DatabaseBackend> Client<B> {
    /// Wraps a connected backend with an empty registry.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            collections: Vec::new(),
            span: default_span(),
        }
    }

    /// Replaces the span every client operation is logged under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Opens the connection with `builder` and registers every existing collection.
    ///
    /// Connecting and discovery share one [`CONNECT_TIMEOUT`] deadline. Builders may create
    /// the client lazily, in which case discovery is the first round-trip to the server. A failed
    /// build aborts construction; a failed discovery is logged and leaves the registry empty.
    pub async fn bootstrap<T>(builder: T) -> CrudResult<Self>
    where
        T: DatabaseBackendBuilder<Backend = B>,
    {
        Self::bootstrap_with_span(builder, default_span()).await
    }

    /// Like [`Client::bootstrap`], logging under `span`.
    pub async fn bootstrap_with_span<T>(builder: T, span: Span) -> CrudResult<Self>
    where
        T: DatabaseBackendBuilder<Backend = B>,
    {
        let ctx = OpContext::with_timeout(CONNECT_TIMEOUT);
        let client_span = span.clone();

        async move {
            let backend = match ctx.run(builder.build()).await {
                Ok(backend) => backend,
                Err(e) => {
                    error!(op = "bootstrap", error = %e, "client creation failed");
                    return Err(e);
                }
            };
            info!(op = "bootstrap", "client created");

            let mut client = Self::new(backend).with_span(client_span);

            match client.discover(&ctx).await {
                Ok(count) => info!(op = "bootstrap", collections = count, "collections discovered"),
                Err(e) => warn!(op = "bootstrap", error = %e, "unable to get collection names"),
            }

            Ok(client)
        }
        .instrument(span)
        .await
    }

    /// Re-runs discovery under a fresh [`CONNECT_TIMEOUT`] deadline and registers collections
    /// that are not yet known. Returns how many were added.
    pub async fn refresh_collections(&mut self) -> CrudResult<usize> {
        let ctx = OpContext::with_timeout(CONNECT_TIMEOUT);
        let span = self.span.clone();

        async {
            match self.discover(&ctx).await {
                Ok(added) => {
                    debug!(op = "refresh_collections", added);
                    Ok(added)
                }
                Err(e) => {
                    warn!(op = "refresh_collections", error = %e, "get collections failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Pings the primary under a fresh [`CONNECT_TIMEOUT`] deadline.
    ///
    /// The outcome is always logged. Callers wanting fire-and-forget health checks can ignore
    /// the returned error.
    pub async fn ping(&self) -> CrudResult<()> {
        let ctx = OpContext::with_timeout(CONNECT_TIMEOUT);

        async {
            match ctx.run(self.backend.ping(&ctx)).await {
                Ok(()) => {
                    info!(op = "ping", "client ping success");
                    Ok(())
                }
                Err(e) => {
                    error!(op = "ping", error = %e, "ping failed");
                    Err(e)
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }

    /// Lists the collection names currently in the database, under a fresh
    /// [`CONNECT_TIMEOUT`] deadline.
    pub async fn list_collections(&self) -> CrudResult<Vec<String>> {
        let ctx = OpContext::with_timeout(CONNECT_TIMEOUT);

        async {
            ctx.run(self.backend.list_collection_names(&ctx))
                .await
                .inspect_err(|e| warn!(op = "list_collections", error = %e, "get collections failed"))
        }
        .instrument(self.span.clone())
        .await
    }

    /// Looks a registered collection up by name.
    pub fn get_collection(&self, name: &str) -> Option<&Collection> {
        self.collections
            .iter()
            .find(|collection| collection.name() == name)
    }

    /// Like [`Client::get_collection`], failing with [`CrudError::CollectionNotFound`].
    pub fn collection(&self, name: &str) -> CrudResult<&Collection> {
        self.get_collection(name)
            .ok_or_else(|| CrudError::CollectionNotFound(name.to_string()))
    }

    /// Registers `collections`, appending new names and replacing same-named entries in place.
    pub fn add_collections<I>(&mut self, collections: I)
    where
        I: IntoIterator<Item = Collection>,
    {
        let _guard = self.span.enter();

        for collection in collections {
            let position = self
                .collections
                .iter()
                .position(|existing| existing.name() == collection.name());

            match position {
                Some(index) => {
                    debug!(op = "add_collections", collection = collection.name(), "collection replaced");
                    self.collections[index] = collection;
                }
                None => {
                    debug!(op = "add_collections", collection = collection.name(), "collection added");
                    self.collections.push(collection);
                }
            }
        }
    }

    /// Registered collections in registration order.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(Collection::name)
    }

    /// The connected backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Closes the connection.
    pub async fn shutdown(self) -> CrudResult<()> {
        self.backend.shutdown().await
    }

    async fn discover(&mut self, ctx: &OpContext) -> CrudResult<usize> {
        let names = ctx.run(self.backend.list_collection_names(ctx)).await?;
        let mut added = 0;

        for name in names {
            if self.get_collection(&name).is_none() {
                let handle = self.backend.collection_handle(&name).await;
                self.collections.push(Collection::from_handle(name, handle));
                added += 1;
            }
        }

        Ok(added)
    }
}

fn default_span() -> Span {
    info_span!("crudlayer", package = "crudlayer")
}
