//! In-memory storage backend for crudlayer.
//!
//! This crate provides thread-safe, in-memory implementations of the `CollectionHandle` and
//! `DatabaseBackend` traits. It uses async-aware read-write locks for concurrent access and is
//! meant for development and testing.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Equality filters** - Top-level and dotted-path field matching
//! - **Call recording** - Every handle call is logged with the caller's remaining deadline
//! - **Fault injection** - Per-operation errors and latency, offline databases, failing connects
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
//!     let users = client.collection("users")?.typed::<User>();
//!
//!     let ctx = OpContext::background();
//!     users.insert(&ctx, &User { id: ObjectId::new(), name: "Alice".into() }).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as crudlayer_memory;

pub mod collection;
pub mod database;
mod matcher;

pub use collection::{InMemoryCollection, Operation, RecordedCall};
pub use database::{InMemoryDatabase, InMemoryDatabaseBuilder};
