//! Key-value store port

use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

/// The handful of key-value primitives the cache layers are built on.
///
/// Values are raw bytes. Scalars and lists live in the same keyspace, so
/// list commands against a scalar key (and the reverse) fail with
/// [`StoreError::WrongType`](crate::StoreError::WrongType).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a scalar value. Expired keys read as absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write a scalar value, dropping any previous expiry.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Write a scalar value that expires after `ttl`.
    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Increment the integer at `key` by one, starting from zero.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Append to the list at `key`, returning the new length.
    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize>;

    /// Read list elements `start..=stop`; negative indices count from the end.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// Remove every key.
    async fn flushdb(&self) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}
