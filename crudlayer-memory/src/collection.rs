//! In-memory implementation of the collection capability set.
//!
//! Besides storing documents, [`InMemoryCollection`] is a test double: it records every call it
//! receives together with the time left on the caller's deadline, and can be told to fail or
//! stall a given operation.

use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::trace;

use crudlayer_core::{
    context::OpContext,
    error::{CrudError, CrudResult},
    handle::{CollectionHandle, DeleteAck, InsertOneAck, ReplaceAck, SingleResult},
};

use crate::matcher::matches;

/// The four operations of the capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    InsertOne,
    FindOne,
    ReplaceOne,
    DeleteOne,
}

/// One call received by an [`InMemoryCollection`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: Operation,
    /// The filter passed to the call; `None` for inserts.
    pub filter: Option<Document>,
    /// Time left on the caller's deadline when the call arrived.
    pub remaining: Option<Duration>,
}

#[derive(Debug, Default)]
struct CollectionState {
    documents: Vec<Document>,
    calls: Vec<RecordedCall>,
    faults: HashMap<Operation, String>,
    latency: HashMap<Operation, Duration>,
}

/// Thread-safe in-memory collection.
///
/// Clones share the same documents, call log and fault settings. Documents are kept in insertion
/// order and lookups scan them linearly.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCollection {
    name: String,
    state: Arc<RwLock<CollectionState>>,
}

impl InMemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(RwLock::new(CollectionState::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the stored documents in insertion order.
    pub async fn documents(&self) -> Vec<Document> {
        self.state.read().await.documents.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Stores `documents` directly, bypassing the call log and fault injection.
    pub async fn seed(&self, documents: impl IntoIterator<Item = Document>) {
        self.state.write().await.documents.extend(documents);
    }

    /// Every call received so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.state.read().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.write().await.calls.clear();
    }

    /// Makes every subsequent `operation` fail with a backend error carrying `message`.
    pub async fn fail(&self, operation: Operation, message: impl Into<String>) {
        self.state
            .write()
            .await
            .faults
            .insert(operation, message.into());
    }

    pub async fn clear_faults(&self) {
        self.state.write().await.faults.clear();
    }

    /// Delays every subsequent `operation` by `latency` before it touches the documents.
    pub async fn set_latency(&self, operation: Operation, latency: Duration) {
        self.state
            .write()
            .await
            .latency
            .insert(operation, latency);
    }

    /// Logs the call, waits out any configured latency, then applies any configured fault.
    async fn enter(
        &self,
        operation: Operation,
        ctx: &OpContext,
        filter: Option<&Document>,
    ) -> CrudResult<()> {
        trace!(collection = %self.name, ?operation, "in-memory call");

        let (fault, latency) = {
            let mut state = self.state.write().await;
            state.calls.push(RecordedCall {
                operation,
                filter: filter.cloned(),
                remaining: ctx.remaining(),
            });

            (
                state.faults.get(&operation).cloned(),
                state.latency.get(&operation).copied(),
            )
        };

        if let Some(latency) = latency {
            sleep(latency).await;
        }

        match fault {
            Some(message) => Err(CrudError::Backend(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CollectionHandle for InMemoryCollection {
    async fn insert_one(&self, ctx: &OpContext, mut document: Document) -> CrudResult<InsertOneAck> {
        self.enter(Operation::InsertOne, ctx, None).await?;

        let id = match document.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                document.insert("_id", id.clone());
                id
            }
        };

        let mut state = self.state.write().await;

        if state
            .documents
            .iter()
            .any(|existing| existing.get("_id") == Some(&id))
        {
            return Err(CrudError::Backend(format!(
                "duplicate key in collection {}: {}",
                self.name, id
            )));
        }

        state.documents.push(document);

        Ok(InsertOneAck { inserted_id: id })
    }

    async fn find_one(&self, ctx: &OpContext, filter: Document) -> SingleResult {
        if let Err(e) = self.enter(Operation::FindOne, ctx, Some(&filter)).await {
            return SingleResult::from_error(e);
        }

        let state = self.state.read().await;

        let found = state
            .documents
            .iter()
            .find(|document| matches(document, &filter))
            .cloned();

        SingleResult::from(CrudResult::Ok(found))
    }

    async fn replace_one(
        &self,
        ctx: &OpContext,
        filter: Document,
        mut document: Document,
    ) -> CrudResult<ReplaceAck> {
        self.enter(Operation::ReplaceOne, ctx, Some(&filter)).await?;

        let mut state = self.state.write().await;
        let Some(existing) = state
            .documents
            .iter_mut()
            .find(|existing| matches(existing, &filter))
        else {
            return Ok(ReplaceAck::default());
        };

        let existing_id = existing.get("_id").cloned().unwrap_or(Bson::Null);
        match document.get("_id") {
            Some(id) if *id != existing_id => {
                return Err(CrudError::Backend(format!(
                    "replacement would modify immutable field _id in collection {}",
                    self.name
                )));
            }
            Some(_) => {}
            None => {
                document.insert("_id", existing_id);
            }
        }

        let modified = *existing != document;
        *existing = document;

        Ok(ReplaceAck {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_one(&self, ctx: &OpContext, filter: Document) -> CrudResult<DeleteAck> {
        self.enter(Operation::DeleteOne, ctx, Some(&filter)).await?;

        let mut state = self.state.write().await;
        let position = state
            .documents
            .iter()
            .position(|document| matches(document, &filter));

        Ok(match position {
            Some(index) => {
                state.documents.remove(index);
                DeleteAck { deleted_count: 1 }
            }
            None => DeleteAck::default(),
        })
    }
}
