//! The capability set a store handle must provide.
//!
//! [`CollectionHandle`] is the only contract a storage backend has to satisfy for a
//! [`Collection`](crate::collection::Collection) to work on top of it: insert one document, find
//! one document, replace one document, delete one document. Nothing above this seam assumes any
//! other store feature, so an in-memory fake can stand in for a live store.
//!
//! # Example
//!
//! ```ignore
//! use crudlayer::{handle::CollectionHandle, context::OpContext, bson::doc};
//!
//! let ctx = OpContext::background();
//! handle.insert_one(&ctx, doc! { "_id": id, "name": "Alice" }).await?;
//! let found = handle.find_one(&ctx, doc! { "_id": id }).await;
//! assert!(found.err().is_none());
//! ```

use async_trait::async_trait;
use bson::{Bson, Document, de::deserialize_from_bson};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::{
    context::OpContext,
    error::{CrudError, CrudResult},
};

/// Acknowledgement of a single insert.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOneAck {
    /// The `_id` of the inserted document.
    pub inserted_id: Bson,
}

/// Acknowledgement of a single replace.
///
/// A replace that matched nothing is still acknowledged, with `matched_count == 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceAck {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Acknowledgement of a single delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteAck {
    pub deleted_count: u64,
}

/// The outcome of a `find_one`: either the matched document or the error that prevented it.
///
/// The error is not raised when the lookup completes; callers inspect it with
/// [`SingleResult::err`] or meet it when decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleResult {
    result: CrudResult<Document>,
}

impl SingleResult {
    pub fn from_document(document: Document) -> Self {
        Self { result: Ok(document) }
    }

    pub fn from_error(error: CrudError) -> Self {
        Self { result: Err(error) }
    }

    /// The error carried by this result, if any. A lookup matching nothing carries
    /// [`CrudError::NoDocuments`].
    pub fn err(&self) -> Option<&CrudError> {
        self.result.as_ref().err()
    }

    /// The matched document, if the lookup succeeded.
    pub fn document(&self) -> Option<&Document> {
        self.result.as_ref().ok()
    }

    pub fn into_document(self) -> CrudResult<Document> {
        self.result
    }

    /// Decodes the matched document into `T`.
    ///
    /// # Errors
    ///
    /// The carried lookup error, or [`CrudError::Serialization`] if decoding fails.
    pub fn decode<T: DeserializeOwned>(&self) -> CrudResult<T> {
        let document = self.result.as_ref().map_err(Clone::clone)?;

        Ok(deserialize_from_bson(Bson::Document(document.clone()))?)
    }
}

impl From<CrudResult<Option<Document>>> for SingleResult {
    fn from(result: CrudResult<Option<Document>>) -> Self {
        match result {
            Ok(Some(document)) => Self::from_document(document),
            Ok(None) => Self::from_error(CrudError::NoDocuments),
            Err(error) => Self::from_error(error),
        }
    }
}

/// Minimal operation set of a store collection handle.
///
/// Every method receives the caller's [`OpContext`]. The collection layer already bounds each
/// call with [`OpContext::run`]; implementations may additionally forward the remaining time to
/// the store.
///
/// Store-level failures are reported as [`CrudError::Backend`]; the collection layer collapses
/// them into its own coarse variants.
#[async_trait]
pub trait CollectionHandle: Send + Sync + Debug {
    /// Inserts one document.
    async fn insert_one(&self, ctx: &OpContext, document: Document) -> CrudResult<InsertOneAck>;

    /// Finds the first document matching `filter`.
    async fn find_one(&self, ctx: &OpContext, filter: Document) -> SingleResult;

    /// Replaces the first document matching `filter` with `document`.
    async fn replace_one(
        &self,
        ctx: &OpContext,
        filter: Document,
        document: Document,
    ) -> CrudResult<ReplaceAck>;

    /// Deletes the first document matching `filter`.
    async fn delete_one(&self, ctx: &OpContext, filter: Document) -> CrudResult<DeleteAck>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn missing_document_is_an_error() {
        let result = SingleResult::from(CrudResult::Ok(None));
        assert_eq!(result.err(), Some(&CrudError::NoDocuments));
        assert_eq!(result.decode::<Named>(), Err(CrudError::NoDocuments));
    }

    #[test]
    fn decode_found_document() {
        let result = SingleResult::from(CrudResult::Ok(Some(doc! { "name": "Ada" })));
        assert!(result.err().is_none());
        assert_eq!(result.decode::<Named>().unwrap(), Named { name: "Ada".into() });
        assert_eq!(result.into_document().unwrap(), doc! { "name": "Ada" });
    }

    #[test]
    fn decode_mismatch_is_serialization_error() {
        let result = SingleResult::from_document(doc! { "other": 1 });
        assert!(matches!(
            result.decode::<Named>(),
            Err(CrudError::Serialization(_))
        ));
    }
}
