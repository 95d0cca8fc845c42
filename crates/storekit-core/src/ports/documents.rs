//! Document collection port

use crate::query::{Filter, GroupCount};
use crate::Result;
use async_trait::async_trait;
use bson::{Bson, Document};

/// An already-open collection handle.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Insert a document and return the id the store assigned to it.
    async fn insert_one(&self, document: Document) -> Result<Bson>;

    /// All documents matching `filter`, in natural order.
    async fn find(&self, filter: &Filter) -> Result<Vec<Document>>;

    async fn count_documents(&self, filter: &Filter) -> Result<u64>;

    /// Count documents per distinct value of `field`, most frequent first.
    async fn group_count(&self, field: &str, limit: i64) -> Result<Vec<GroupCount>>;

    async fn ping(&self) -> Result<()>;
}
