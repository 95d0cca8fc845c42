//! MongoCollection integration tests
//!
//! Requires MongoDB on localhost:27017, or set MONGO_URI. Tests are skipped
//! when no server answers. Each test writes to a fresh collection.

use bson::{doc, Bson};
use storekit_core::{DocumentCollection, Filter};
use storekit_storage::MongoCollection;

fn get_mongo_uri() -> String {
    std::env::var("MONGO_URI")
        .unwrap_or_else(|_| "mongodb://127.0.0.1:27017/?serverSelectionTimeoutMS=2000".to_string())
}

async fn open(name: &str) -> Option<MongoCollection> {
    let collection = format!("{}_{}", name, uuid::Uuid::new_v4().simple());
    let handle = MongoCollection::connect(&get_mongo_uri(), "storekit_test", &collection)
        .await
        .ok()?;
    handle.ping().await.ok()?;
    Some(handle)
}

macro_rules! mongo_or_skip {
    ($name:expr) => {
        match open($name).await {
            Some(collection) => collection,
            None => {
                eprintln!("Skipping test: MongoDB not available at {}", get_mongo_uri());
                return;
            }
        }
    };
}

#[tokio::test]
async fn test_insert_then_find() {
    let collection = mongo_or_skip!("schools");

    let id = collection
        .insert_one(doc! { "name": "Holberton school", "topics": ["Algo", "C", "Python"] })
        .await
        .expect("insert_one failed");
    assert!(matches!(id, Bson::ObjectId(_)));

    let found = collection
        .find(&Filter::contains("topics", "Python"))
        .await
        .expect("find failed");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("_id"), Some(&id));
    assert!(collection
        .find(&Filter::contains("topics", "Rust"))
        .await
        .expect("find failed")
        .is_empty());
}

#[tokio::test]
async fn test_count_and_group() {
    let collection = mongo_or_skip!("nginx");

    for (ip, method, path) in [
        ("10.0.0.1", "GET", "/status"),
        ("10.0.0.1", "GET", "/"),
        ("10.0.0.2", "POST", "/login"),
    ] {
        collection
            .insert_one(doc! { "ip": ip, "method": method, "path": path })
            .await
            .expect("insert_one failed");
    }

    let status = Filter::and([Filter::eq("method", "GET"), Filter::eq("path", "/status")]);
    assert_eq!(collection.count_documents(&Filter::All).await.expect("count failed"), 3);
    assert_eq!(collection.count_documents(&status).await.expect("count failed"), 1);

    let top = collection.group_count("ip", 10).await.expect("aggregate failed");
    assert_eq!(top[0].key_text(), "10.0.0.1");
    assert_eq!(top[0].count, 2);
}

#[tokio::test]
async fn test_wrap_open_database() {
    let client = match mongodb::Client::with_uri_str(get_mongo_uri()).await {
        Ok(client) => client,
        Err(_) => {
            eprintln!("Skipping test: MongoDB not available at {}", get_mongo_uri());
            return;
        }
    };
    let name = format!("wrapped_{}", uuid::Uuid::new_v4().simple());
    let collection = MongoCollection::new(&client.database("storekit_test"), &name);

    if collection.ping().await.is_err() {
        eprintln!("Skipping test: MongoDB not available at {}", get_mongo_uri());
        return;
    }
    assert_eq!(collection.name(), name);
    collection
        .insert_one(doc! { "name": "UCSF" })
        .await
        .expect("insert_one failed");
    assert_eq!(collection.count_documents(&Filter::All).await.expect("count failed"), 1);
}
