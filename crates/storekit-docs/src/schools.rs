//! School collection queries

use bson::{Bson, Document};
use storekit_core::{DocumentCollection, Filter, Result};
use tracing::debug;

/// Every document in the collection
pub async fn list_all(collection: &dyn DocumentCollection) -> Result<Vec<Document>> {
    collection.find(&Filter::All).await
}

/// Insert a new school built from `fields` and return its id.
///
/// Each call creates a new document, even for identical fields.
pub async fn insert_school(collection: &dyn DocumentCollection, fields: Document) -> Result<Bson> {
    let id = collection.insert_one(fields).await?;
    debug!("Inserted school {}", id);
    Ok(id)
}

/// Schools whose `topics` include `topic`
pub async fn schools_by_topic(
    collection: &dyn DocumentCollection,
    topic: &str,
) -> Result<Vec<Document>> {
    collection.find(&Filter::contains("topics", topic)).await
}
