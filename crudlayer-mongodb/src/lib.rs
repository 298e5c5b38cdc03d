//! MongoDB backend implementation for crudlayer.
//!
//! This crate provides MongoDB-based implementations of the `CollectionHandle` and
//! `DatabaseBackend` traits on top of the official async driver.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! crudlayer = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The builder takes a connection URI, either given directly or assembled from a
//! `DatabaseConfig`. Connection and collection discovery are bounded by the client's connect
//! timeout.
//!
//! # Example
//!
//! ```ignore
//! use crudlayer::{prelude::*, mongodb::MongoDbBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env("APP_DB")?;
//!     let client = Client::bootstrap(MongoDbBuilder::from_config(&config)?).await?;
//!
//!     client.ping().await?;
//!     client.shutdown().await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as crudlayer_mongodb;

pub mod database;
pub mod handle;

pub use database::{MongoDatabase, MongoDbBuilder};
pub use handle::MongoCollectionHandle;
