//! Generic CRUD operations over a single named collection.
//!
//! A [`Collection`] pairs a name with a store handle implementing the
//! [`CollectionHandle`] capability set. Records are any [`Record`] type; the collection checks
//! the record's preconditions, builds identity filters, calls the handle, and collapses store
//! failures into one coarse [`CrudError`] variant per operation while logging the detail.
//!
//! - [`Collection`] - untyped view returning lazy [`SingleResult`]s
//! - [`TypedCollection`] - view bound to one record type, decoding results directly
//!
//! # Example
//!
//! ```ignore
//! use crudlayer::prelude::*;
//!
//! let users = client.collection("users")?;
//! let ctx = OpContext::with_timeout(Duration::from_secs(5));
//!
//! let stored: User = users.new_item(&ctx, &user).await?.decode()?;
//! assert!(users.item_exists(&ctx, "id", &user.id.to_hex()).await);
//!
//! users.delete_item(user.id).await?;
//! ```

use bson::{Document, oid::ObjectId};
use std::{marker::PhantomData, sync::Arc};
use tracing::{debug, error, warn};

use crate::{
    context::{DELETE_TIMEOUT, OpContext},
    error::{CrudError, CrudResult},
    filter::{IdPolicy, id_filter, lookup_filter},
    handle::{CollectionHandle, SingleResult},
    record::{Record, RecordExt},
};

/// A named collection backed by a capability-set handle.
///
/// Cloning is cheap; clones share the handle.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    handle: Arc<dyn CollectionHandle>,
    id_policy: IdPolicy,
}

impl Collection {
    /// Wraps `handle` as the collection `name`.
    pub fn new<H>(name: impl Into<String>, handle: H) -> Self
    where
        H: CollectionHandle + 'static,
    {
        Self::from_handle(name, Arc::new(handle))
    }

    /// Wraps an already shared handle as the collection `name`.
    pub fn from_handle(name: impl Into<String>, handle: Arc<dyn CollectionHandle>) -> Self {
        Self {
            name: name.into(),
            handle,
            id_policy: IdPolicy::default(),
        }
    }

    /// Sets how undecodable identifier lookups are treated.
    pub fn with_id_policy(mut self, id_policy: IdPolicy) -> Self {
        self.id_policy = id_policy;
        self
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// The underlying store handle.
    pub fn handle(&self) -> &Arc<dyn CollectionHandle> {
        &self.handle
    }

    /// A view of this collection bound to the record type `R`.
    pub fn typed<R: Record>(&self) -> TypedCollection<'_, R> {
        TypedCollection::new(self)
    }

    /// Inserts `record` and returns the document as persisted.
    ///
    /// # Errors
    ///
    /// - [`CrudError::ValueNotStruct`] if the record does not serialize to a document
    /// - [`CrudError::IdBlank`] if the record carries the nil identifier
    /// - [`CrudError::InsertFailed`] if the store rejects the insert
    /// - [`CrudError::GetFailed`] if the inserted document cannot be read back
    pub async fn new_item<R: Record>(&self, ctx: &OpContext, record: &R) -> CrudResult<SingleResult> {
        let document = checked_document(record)?;
        let id = record.id();

        if let Err(e) = ctx.run(self.handle.insert_one(ctx, document)).await {
            error!(op = "new_item", collection = %self.name, %id, error = %e, "insert failed");
            return Err(CrudError::InsertFailed);
        }

        debug!(op = "new_item", collection = %self.name, %id, "item inserted");

        self.get_item(ctx, "id", &id.to_hex()).await
    }

    /// Returns `true` if a document matches `by == value`.
    ///
    /// Every lookup failure, not only a missing document, counts as "does not exist".
    pub async fn item_exists(&self, ctx: &OpContext, by: &str, value: &str) -> bool {
        let filter = match lookup_filter(by, value, self.id_policy) {
            Ok(filter) => filter,
            Err(e) => {
                debug!(op = "item_exists", collection = %self.name, by, error = %e, "lookup rejected");
                return false;
            }
        };

        let exists = self.find(ctx, filter).await.err().is_none();
        debug!(op = "item_exists", collection = %self.name, by, exists);

        exists
    }

    /// Looks up the first document matching `by == value`.
    ///
    /// With the lenient id policy an identifier value that is not valid hex is looked up as the
    /// nil identifier rather than rejected.
    ///
    /// # Errors
    ///
    /// - [`CrudError::InvalidId`] for undecodable identifiers under the strict id policy
    /// - [`CrudError::GetFailed`] if the lookup carries any error, including no match
    pub async fn get_item(&self, ctx: &OpContext, by: &str, value: &str) -> CrudResult<SingleResult> {
        let filter = lookup_filter(by, value, self.id_policy)?;
        let result = self.find(ctx, filter).await;

        match result.err() {
            Some(CrudError::NoDocuments) => {
                warn!(op = "get_item", collection = %self.name, by, value, "no item matched");
                return Err(CrudError::GetFailed);
            }
            Some(e) => {
                error!(op = "get_item", collection = %self.name, by, value, error = %e, "get failed");
                return Err(CrudError::GetFailed);
            }
            None => {}
        }

        debug!(op = "get_item", collection = %self.name, by, value, "item found");

        Ok(result)
    }

    /// Replaces the stored document with `record`, matched by identifier, and returns the
    /// document as persisted.
    ///
    /// A replace that matches nothing is not an error here; the read-back that follows then
    /// fails with [`CrudError::GetFailed`]. Concurrent writers are not detected: the last
    /// replace wins.
    ///
    /// # Errors
    ///
    /// - [`CrudError::ValueNotStruct`] if the record does not serialize to a document
    /// - [`CrudError::IdBlank`] if the record carries the nil identifier
    /// - [`CrudError::UpdateFailed`] if the store rejects the replace
    /// - [`CrudError::GetFailed`] if the document cannot be read back
    pub async fn update_item<R: Record>(&self, ctx: &OpContext, record: &R) -> CrudResult<SingleResult> {
        let document = checked_document(record)?;
        let id = record.id();

        match ctx.run(self.handle.replace_one(ctx, id_filter(id), document)).await {
            Ok(ack) => debug!(
                op = "update_item",
                collection = %self.name,
                %id,
                matched = ack.matched_count,
                modified = ack.modified_count,
                "item replaced"
            ),
            Err(e) => {
                error!(op = "update_item", collection = %self.name, %id, error = %e, "replace failed");
                return Err(CrudError::UpdateFailed);
            }
        }

        self.get_item(ctx, "id", &id.to_hex()).await
    }

    /// Deletes the document with identifier `id`.
    ///
    /// Always runs under its own [`DELETE_TIMEOUT`] deadline, whatever deadline the caller is
    /// working under.
    ///
    /// # Errors
    ///
    /// [`CrudError::DeleteFailed`] if the store rejects the delete or the deadline elapses.
    pub async fn delete_item(&self, id: ObjectId) -> CrudResult<()> {
        let ctx = OpContext::with_timeout(DELETE_TIMEOUT);

        match ctx.run(self.handle.delete_one(&ctx, id_filter(id))).await {
            Ok(ack) => {
                debug!(op = "delete_item", collection = %self.name, %id, deleted = ack.deleted_count);
                Ok(())
            }
            Err(e) => {
                error!(op = "delete_item", collection = %self.name, %id, error = %e, "delete failed");
                Err(CrudError::DeleteFailed)
            }
        }
    }

    async fn find(&self, ctx: &OpContext, filter: Document) -> SingleResult {
        ctx.run(async { Ok(self.handle.find_one(ctx, filter).await) })
            .await
            .unwrap_or_else(SingleResult::from_error)
    }
}

/// Serializes `record` and checks the write preconditions in order: structured document first,
/// then non-nil identifier.
fn checked_document<R: Record>(record: &R) -> CrudResult<Document> {
    let document = record.to_document()?;

    if !record.has_id() {
        return Err(CrudError::IdBlank);
    }

    Ok(document)
}

/// A [`Collection`] view bound to the record type `R`.
#[derive(Debug)]
pub struct TypedCollection<'a, R: Record> {
    collection: &'a Collection,
    _marker: PhantomData<R>,
}

impl<'a, R: Record> TypedCollection<'a, R> {
    pub(crate) fn new(collection: &'a Collection) -> Self {
        Self { collection, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        self.collection.name()
    }

    /// Converts this view to a different record type.
    pub fn with_type<T: Record>(&self) -> TypedCollection<'a, T> {
        TypedCollection::new(self.collection)
    }

    /// See [`Collection::new_item`].
    pub async fn insert(&self, ctx: &OpContext, record: &R) -> CrudResult<R> {
        self.collection.new_item(ctx, record).await?.decode()
    }

    /// See [`Collection::get_item`].
    pub async fn get(&self, ctx: &OpContext, by: &str, value: &str) -> CrudResult<R> {
        self.collection.get_item(ctx, by, value).await?.decode()
    }

    pub async fn get_by_id(&self, ctx: &OpContext, id: ObjectId) -> CrudResult<R> {
        self.get(ctx, "_id", &id.to_hex()).await
    }

    /// See [`Collection::update_item`].
    pub async fn update(&self, ctx: &OpContext, record: &R) -> CrudResult<R> {
        self.collection.update_item(ctx, record).await?.decode()
    }

    /// See [`Collection::item_exists`].
    pub async fn exists(&self, ctx: &OpContext, by: &str, value: &str) -> bool {
        self.collection.item_exists(ctx, by, value).await
    }

    /// See [`Collection::delete_item`].
    pub async fn delete(&self, id: ObjectId) -> CrudResult<()> {
        self.collection.delete_item(id).await
    }
}
