#![allow(dead_code)]

use crudlayer::{
    Record,
    bson::oid::ObjectId,
    client::Client,
    memory::{InMemoryCollection, InMemoryDatabase},
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(name: &str) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }
}

/// Keyed by a differently named field; the identifier is stored both as `key` and `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
pub struct Order {
    #[record(id)]
    pub key: ObjectId,
    pub total: i64,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A client bootstrapped over a fresh in-memory database holding a `users` collection, plus
/// direct access to that collection's storage.
pub async fn users_client() -> (Client<InMemoryDatabase>, InMemoryCollection) {
    init_tracing();

    let database = InMemoryDatabase::new();
    let users = database.collection("users").await;
    let client = Client::bootstrap(InMemoryDatabase::builder().with_database(database))
        .await
        .unwrap();

    (client, users)
}
