//! In-process stores with Redis and MongoDB semantics

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use dashmap::DashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use storekit_core::query::values_equal;
use storekit_core::{DocumentCollection, Filter, GroupCount, KeyValueStore, Result, StoreError};

/// Key-value store backed by a `DashMap`, with lazily checked TTLs
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<DashMap<String, Entry>>,
}

enum Value {
    Scalar(Vec<u8>),
    List(Vec<Vec<u8>>),
}

struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn scalar(value: Vec<u8>, expires_at: Option<Instant>) -> Self {
        Self {
            value: Value::Scalar(value),
            expires_at,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map(|expires| now >= expires).unwrap_or(false)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.data.iter().filter(|entry| !entry.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired key
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| !entry.is_expired(now));
    }

    fn evict_if_expired(&self, key: &str) {
        let now = Instant::now();
        self.data.remove_if(key, |_, entry| entry.is_expired(now));
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.evict_if_expired(key);
        match self.data.get(key) {
            Some(entry) => match &entry.value {
                Value::Scalar(bytes) => Ok(Some(bytes.clone())),
                Value::List(_) => Err(StoreError::WrongType(key.to_string())),
            },
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.data
            .insert(key.to_string(), Entry::scalar(value.to_vec(), None));
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        self.data.insert(
            key.to_string(),
            Entry::scalar(value.to_vec(), Some(Instant::now() + ttl)),
        );
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.evict_if_expired(key);
        let mut entry = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Entry::scalar(b"0".to_vec(), None));

        let current = match &entry.value {
            Value::Scalar(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|text| text.parse::<i64>().ok())
                .ok_or_else(|| StoreError::NotAnInteger(key.to_string()))?,
            Value::List(_) => return Err(StoreError::WrongType(key.to_string())),
        };
        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::NotAnInteger(key.to_string()))?;

        entry.value = Value::Scalar(next.to_string().into_bytes());
        Ok(next)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        self.evict_if_expired(key);
        let mut entry = self.data.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::List(Vec::new()),
            expires_at: None,
        });

        match &mut entry.value {
            Value::List(items) => {
                items.push(value.to_vec());
                Ok(items.len())
            }
            Value::Scalar(_) => Err(StoreError::WrongType(key.to_string())),
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        self.evict_if_expired(key);
        let entry = match self.data.get(key) {
            Some(entry) => entry,
            None => return Ok(Vec::new()),
        };
        let items = match &entry.value {
            Value::List(items) => items,
            Value::Scalar(_) => return Err(StoreError::WrongType(key.to_string())),
        };

        Ok(match list_bounds(items.len(), start, stop) {
            Some((from, to)) => items[from..=to].to_vec(),
            None => Vec::new(),
        })
    }

    async fn flushdb(&self) -> Result<()> {
        self.data.clear();
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Resolve LRANGE indices to an inclusive in-bounds range
fn list_bounds(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}

/// Document collection held in process, in insertion order
#[derive(Clone, Default)]
pub struct MemoryCollection {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Document>>> {
        self.documents
            .read()
            .map_err(|e| StoreError::Database(format!("Collection lock poisoned: {}", e)))
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn insert_one(&self, document: Document) -> Result<Bson> {
        let (id, document) = match document.get("_id") {
            Some(id) => (id.clone(), document),
            None => {
                // The store puts a generated _id first
                let id = Bson::ObjectId(ObjectId::new());
                let mut stored = Document::new();
                stored.insert("_id", id.clone());
                stored.extend(document);
                (id, stored)
            }
        };

        let mut documents = self
            .documents
            .write()
            .map_err(|e| StoreError::Database(format!("Collection lock poisoned: {}", e)))?;
        if documents.iter().any(|existing| existing.get("_id") == Some(&id)) {
            return Err(StoreError::Database(format!(
                "E11000 duplicate key error: _id {}",
                id
            )));
        }
        documents.push(document);
        Ok(id)
    }

    async fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        Ok(self
            .read()?
            .iter()
            .filter(|document| filter.matches(document))
            .cloned()
            .collect())
    }

    async fn count_documents(&self, filter: &Filter) -> Result<u64> {
        Ok(self
            .read()?
            .iter()
            .filter(|document| filter.matches(document))
            .count() as u64)
    }

    async fn group_count(&self, field: &str, limit: i64) -> Result<Vec<GroupCount>> {
        if limit <= 0 {
            return Err(StoreError::Database(
                "the limit must be positive".to_string(),
            ));
        }

        let mut groups: Vec<GroupCount> = Vec::new();
        for document in self.read()?.iter() {
            let key = document.get(field).cloned().unwrap_or(Bson::Null);
            match groups.iter_mut().find(|group| values_equal(&group.key, &key)) {
                Some(group) => group.count += 1,
                None => groups.push(GroupCount::new(key, 1)),
            }
        }

        groups.sort_by(|a, b| b.count.cmp(&a.count));
        groups.truncate(limit as usize);
        Ok(groups)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
