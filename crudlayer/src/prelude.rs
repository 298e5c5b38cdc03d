//! Convenient re-exports of commonly used types from crudlayer.
//!
//! ```ignore
//! use crudlayer::prelude::*;
//! ```

pub use crudlayer_core::{
    backend::{DatabaseBackend, DatabaseBackendBuilder},
    client::Client,
    collection::{Collection, TypedCollection},
    config::DatabaseConfig,
    context::{CONNECT_TIMEOUT, DELETE_TIMEOUT, OpContext},
    error::{CrudError, CrudResult},
    filter::IdPolicy,
    handle::{CollectionHandle, SingleResult},
    record::{NIL_OBJECT_ID, Record, RecordExt},
};
