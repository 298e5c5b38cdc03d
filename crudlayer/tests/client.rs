mod common;

use std::time::Duration;

use crudlayer::{
    bson::doc,
    memory::{InMemoryCollection, InMemoryDatabase, Operation},
    prelude::*,
};
use tracing::info_span;

use common::{User, init_tracing, users_client};

#[tokio::test]
async fn bootstrap_registers_existing_collections() {
    init_tracing();

    let client = Client::bootstrap(
        InMemoryDatabase::builder()
            .collection("users")
            .collection("orders"),
    )
    .await
    .unwrap();

    assert_eq!(client.collection_names().collect::<Vec<_>>(), vec!["orders", "users"]);
    assert!(client.get_collection("users").is_some());
    assert!(client.get_collection("invoices").is_none());
    assert_eq!(
        client.collection("invoices").unwrap_err(),
        CrudError::CollectionNotFound("invoices".into())
    );
}

#[tokio::test]
async fn discovery_failure_leaves_registry_empty() {
    init_tracing();

    let client = Client::bootstrap(
        InMemoryDatabase::builder()
            .collection("users")
            .offline(true),
    )
    .await
    .unwrap();

    assert!(client.collections().is_empty());
}

#[tokio::test]
async fn connection_failure_aborts_bootstrap() {
    init_tracing();

    let result = Client::bootstrap(InMemoryDatabase::builder().connect_error("auth failed")).await;

    assert_eq!(
        result.unwrap_err(),
        CrudError::Initialization("auth failed".into())
    );
}

#[tokio::test(start_paused = true)]
async fn slow_connection_hits_connect_timeout() {
    init_tracing();

    let result = Client::bootstrap(
        InMemoryDatabase::builder().connect_latency(CONNECT_TIMEOUT + Duration::from_secs(1)),
    )
    .await;

    assert_eq!(result.unwrap_err(), CrudError::DeadlineExceeded);
}

#[tokio::test(start_paused = true)]
async fn slow_connection_within_timeout_succeeds() {
    init_tracing();

    let client = Client::bootstrap_with_span(
        InMemoryDatabase::builder()
            .collection("users")
            .connect_latency(CONNECT_TIMEOUT - Duration::from_secs(1)),
        info_span!("inventory"),
    )
    .await
    .unwrap();

    assert_eq!(client.collections().len(), 1);
}

#[tokio::test]
async fn ping_and_list_report_errors() {
    let (client, _) = users_client().await;

    client.ping().await.unwrap();
    assert_eq!(client.list_collections().await.unwrap(), vec!["users".to_string()]);

    client.backend().set_offline(true).await;

    assert!(matches!(client.ping().await, Err(CrudError::Backend(_))));
    assert!(matches!(client.list_collections().await, Err(CrudError::Backend(_))));
}

#[tokio::test]
async fn add_collections_appends_and_replaces() {
    let (mut client, _) = users_client().await;
    let replacement = InMemoryCollection::new("users");
    replacement
        .seed([doc! { "_id": NIL_OBJECT_ID, "name": "seeded", "email": "" }])
        .await;

    client.add_collections([
        Collection::new("audit", InMemoryCollection::new("audit")),
        Collection::new("users", replacement.clone()),
    ]);

    assert_eq!(client.collection_names().collect::<Vec<_>>(), vec!["users", "audit"]);

    let ctx = OpContext::background();
    let users = client.collection("users").unwrap();
    assert!(users.item_exists(&ctx, "name", "seeded").await);
    assert_eq!(replacement.calls().await[0].operation, Operation::FindOne);
}

#[tokio::test]
async fn refresh_registers_new_collections_only() {
    let (mut client, _) = users_client().await;
    let ctx = OpContext::background();
    let ada = User::new("Ada");
    client
        .collection("users")
        .unwrap()
        .new_item(&ctx, &ada)
        .await
        .unwrap();

    client.backend().collection("orders").await;

    assert_eq!(client.refresh_collections().await.unwrap(), 1);
    assert_eq!(client.refresh_collections().await.unwrap(), 0);
    assert_eq!(client.collection_names().collect::<Vec<_>>(), vec!["users", "orders"]);

    // the existing registration keeps its data across a refresh
    assert!(
        client
            .collection("users")
            .unwrap()
            .item_exists(&ctx, "id", &ada.id.to_hex())
            .await
    );
}

#[tokio::test]
async fn refresh_fails_while_offline() {
    let (mut client, _) = users_client().await;
    client.backend().set_offline(true).await;

    assert!(client.refresh_collections().await.is_err());
    assert_eq!(client.collections().len(), 1);
}

#[tokio::test]
async fn shutdown_releases_backend() {
    let (client, _) = users_client().await;

    client.shutdown().await.unwrap();
}
