//! Error types and result types for collection and client operations.
//!
//! Failures fall in two tiers. Precondition violations on caller-supplied records
//! ([`CrudError::ValueNotPointer`], [`CrudError::ValueNotStruct`], [`CrudError::IdBlank`],
//! [`CrudError::InvalidId`]) are detected before the store is touched. Store interaction
//! failures are collapsed to one coarse variant per operation kind; the underlying detail is
//! only ever written to the log.

use bson::error::Error as BsonError;
use thiserror::Error;

/// Closed set of failures produced by collections, handles and clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrudError {
    /// Reserved for duplicate-key handling. No operation currently produces it.
    #[error("item already exists")]
    AlreadyExists,
    #[error("failed to insert")]
    InsertFailed,
    #[error("failed to get")]
    GetFailed,
    #[error("failed to delete")]
    DeleteFailed,
    #[error("failed to update")]
    UpdateFailed,
    /// The record still carries the nil identifier.
    #[error("id cannot be blank")]
    IdBlank,
    /// The record was not passed by reference.
    ///
    /// The typed API takes records as `&R`, so the compiler rules this out; the variant stays
    /// part of the vocabulary for callers matching on the full set.
    #[error("failed to accept argument, must be a pointer")]
    ValueNotPointer,
    /// The record did not serialize to a structured document.
    #[error("failed to accept argument, must be a struct")]
    ValueNotStruct,
    /// A lookup value could not be decoded as an identifier under the strict id policy.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
    /// A lookup matched no document.
    #[error("no document matched the filter")]
    NoDocuments,
    /// The operation's deadline elapsed before the store answered.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// Conversion between records and BSON documents failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The database configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Error during connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// No collection with this name is registered on the client.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    /// An error reported by the underlying store.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl CrudError {
    /// Returns `true` for violations detected before any store interaction.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CrudError::ValueNotPointer
                | CrudError::ValueNotStruct
                | CrudError::IdBlank
                | CrudError::InvalidId(_)
        )
    }
}

/// A specialized `Result` type for crudlayer operations.
pub type CrudResult<T> = Result<T, CrudError>;

impl From<BsonError> for CrudError {
    fn from(err: BsonError) -> Self {
        CrudError::Serialization(err.to_string())
    }
}
