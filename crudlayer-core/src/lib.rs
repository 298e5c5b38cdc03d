//! A small typed CRUD layer over document collections.
//!
//! This crate is the core of the crudlayer project and provides:
//!
//! - **Records** ([`record`]) - The trait caller-supplied records implement
//! - **Capability set** ([`handle`]) - The four operations a store handle must expose
//! - **Collections** ([`collection`]) - Generic CRUD over one named collection
//! - **Filters** ([`filter`]) - Identity and equality filter construction
//! - **Database backends** ([`backend`]) - Connection-level abstraction used by the client
//! - **Client** ([`client`]) - Connection bootstrap and the collection registry
//! - **Configuration** ([`config`]) - Connection settings and URI assembly
//! - **Contexts** ([`context`]) - Bounded deadlines for store calls
//! - **Error handling** ([`error`]) - The closed error enumeration
//!
//! # Example
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
//! let database = InMemoryDatabase::builder().collection("users");
//! let client = Client::bootstrap(database).await?;
//!
//! let users = client.collection("users")?.typed::<User>();
//! let ctx = OpContext::background();
//! let stored = users.insert(&ctx, &User { id: ObjectId::new(), name: "Alice".into() }).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as crudlayer_core;

pub mod backend;
pub mod client;
pub mod collection;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod handle;
pub mod record;
