use async_trait::async_trait;
use bson::Document;
use mongodb::Collection as MongoCollection;
use tracing::trace;

use crudlayer_core::{
    context::OpContext,
    error::{CrudError, CrudResult},
    handle::{CollectionHandle, DeleteAck, InsertOneAck, ReplaceAck, SingleResult},
};

/// [`CollectionHandle`] over a MongoDB driver collection.
///
/// Deadlines are enforced by the caller's [`OpContext`]; driver errors are reported as
/// [`CrudError::Backend`].
#[derive(Debug, Clone)]
pub struct MongoCollectionHandle {
    collection: MongoCollection<Document>,
}

impl MongoCollectionHandle {
    pub fn new(collection: MongoCollection<Document>) -> Self {
        Self { collection }
    }

    pub fn name(&self) -> &str {
        self.collection.name()
    }

    /// The underlying driver collection.
    pub fn inner(&self) -> &MongoCollection<Document> {
        &self.collection
    }
}

#[async_trait]
impl CollectionHandle for MongoCollectionHandle {
    async fn insert_one(&self, _ctx: &OpContext, document: Document) -> CrudResult<InsertOneAck> {
        trace!(collection = self.name(), "insert_one");

        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| CrudError::Backend(e.to_string()))?;

        Ok(InsertOneAck {
            inserted_id: result.inserted_id,
        })
    }

    async fn find_one(&self, _ctx: &OpContext, filter: Document) -> SingleResult {
        trace!(collection = self.name(), "find_one");

        self.collection
            .find_one(filter)
            .await
            .map_err(|e| CrudError::Backend(e.to_string()))
            .into()
    }

    async fn replace_one(
        &self,
        _ctx: &OpContext,
        filter: Document,
        document: Document,
    ) -> CrudResult<ReplaceAck> {
        trace!(collection = self.name(), "replace_one");

        let result = self
            .collection
            .replace_one(filter, document)
            .await
            .map_err(|e| CrudError::Backend(e.to_string()))?;

        Ok(ReplaceAck {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn delete_one(&self, _ctx: &OpContext, filter: Document) -> CrudResult<DeleteAck> {
        trace!(collection = self.name(), "delete_one");

        let result = self
            .collection
            .delete_one(filter)
            .await
            .map_err(|e| CrudError::Backend(e.to_string()))?;

        Ok(DeleteAck {
            deleted_count: result.deleted_count,
        })
    }
}
