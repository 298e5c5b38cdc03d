//! Main crudlayer crate providing a typed CRUD layer over document collections.
//!
//! This crate is the primary entry point for users of crudlayer. It re-exports the core types
//! from the sub-crates and gives access to the available storage backends.
//!
//! # Features
//!
//! - **Typed records** - Define records with Serde and `#[derive(Record)]`
//! - **Bounded calls** - Every store call runs under an explicit deadline
//! - **Multiple backends** - In-memory and MongoDB backends behind one capability set
//! - **Collection registry** - Connection bootstrap with automatic collection discovery
//!
//! # Quick Start
//!
//! ```ignore
//! use crudlayer::{Record, prelude::*, memory::InMemoryDatabase};
//! use bson::oid::ObjectId;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Record)]
//! pub struct User {
//!     #[serde(rename = "_id")]
//!     pub id: ObjectId,
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::bootstrap(InMemoryDatabase::builder().collection("users")).await?;
//!     let users = client.collection("users")?;
//!     let ctx = OpContext::with_timeout(CONNECT_TIMEOUT);
//!
//!     let user = User { id: ObjectId::new(), name: "Alice".into() };
//!     users.new_item(&ctx, &user).await?;
//!
//!     let found: User = users.get_item(&ctx, "id", &user.id.to_hex()).await?.decode()?;
//!     println!("found {found:?}");
//!
//!     users.delete_item(user.id).await?;
//!     client.shutdown().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use crudlayer_core::{
    backend, client, collection, config, context, error, filter, handle, record,
};
pub use crudlayer_macros::Record;

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use crudlayer_memory::{
        InMemoryCollection, InMemoryDatabase, InMemoryDatabaseBuilder, Operation, RecordedCall,
    };
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use crudlayer_mongodb::{MongoCollectionHandle, MongoDatabase, MongoDbBuilder};
}
