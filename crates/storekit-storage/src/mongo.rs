//! MongoDB document collection

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use storekit_core::query::group_count_pipeline;
use storekit_core::{DocumentCollection, Filter, GroupCount, Result, StoreError};
use tracing::{debug, info};

#[derive(Clone)]
pub struct MongoCollection {
    database: Database,
    collection: Collection<Document>,
}

fn db_error(operation: &str, e: mongodb::error::Error) -> StoreError {
    StoreError::Database(format!("{} failed: {}", operation, e))
}

impl MongoCollection {
    /// Connect to `uri` and open `database.collection`
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        info!("Connecting to MongoDB at {} ({}.{})", uri, database, collection);

        let options = ClientOptions::parse(uri)
            .await
            .map_err(|e| db_error("Parsing connection string", e))?;
        let client = Client::with_options(options).map_err(|e| db_error("Creating client", e))?;

        Ok(Self::new(&client.database(database), collection))
    }

    /// Wrap a collection of an already-open database
    pub fn new(database: &Database, collection: &str) -> Self {
        Self {
            database: database.clone(),
            collection: database.collection::<Document>(collection),
        }
    }

    pub fn name(&self) -> &str {
        self.collection.name()
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn insert_one(&self, document: Document) -> Result<Bson> {
        debug!("insert_one into {}", self.name());
        let result = self
            .collection
            .insert_one(document, None)
            .await
            .map_err(|e| db_error("insert_one", e))?;
        Ok(result.inserted_id)
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        let query = filter.to_document();
        debug!("find {} in {}", query, self.name());

        let cursor = self
            .collection
            .find(query, None)
            .await
            .map_err(|e| db_error("find", e))?;
        cursor.try_collect().await.map_err(|e| db_error("find", e))
    }

    async fn count_documents(&self, filter: &Filter) -> Result<u64> {
        let query = filter.to_document();
        debug!("count_documents {} in {}", query, self.name());

        self.collection
            .count_documents(query, None)
            .await
            .map_err(|e| db_error("count_documents", e))
    }

    async fn group_count(&self, field: &str, limit: i64) -> Result<Vec<GroupCount>> {
        debug!("group_count by {} (limit {}) in {}", field, limit, self.name());

        let cursor = self
            .collection
            .aggregate(group_count_pipeline(field, limit), None)
            .await
            .map_err(|e| db_error("aggregate", e))?;
        let rows: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| db_error("aggregate", e))?;

        rows.iter().map(GroupCount::from_document).collect()
    }

    async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(|e| db_error("ping", e))
    }
}
