//! Redis key-value store
//!
//! Commands go through a `ConnectionManager`, which reconnects on its own;
//! each call clones the manager handle.

use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client, RedisError};
use async_trait::async_trait;
use std::time::Duration;
use storekit_core::{KeyValueStore, Result, StoreError};
use tracing::{debug, info};

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connect to the server at `url` (e.g. "redis://127.0.0.1:6379")
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to Redis at {}", url);

        let client = Client::open(url)
            .map_err(|e| StoreError::Redis(format!("Failed to create Redis client: {}", e)))?;
        let connection = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Redis(format!("Failed to connect to {}: {}", url, e)))?;

        Ok(Self { connection })
    }

    fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }
}

/// Translate a client error, keeping the server's type errors distinguishable
fn map_error(key: &str, e: RedisError) -> StoreError {
    if e.code() == Some("WRONGTYPE") {
        StoreError::WrongType(key.to_string())
    } else if e.to_string().contains("not an integer") {
        StoreError::NotAnInteger(key.to_string())
    } else {
        StoreError::Redis(e.to_string())
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        debug!("GET {}", key);
        self.connection()
            .get::<_, Option<Vec<u8>>>(key)
            .await
            .map_err(|e| map_error(key, e))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        debug!("SET {} ({} bytes)", key, value.len());
        self.connection()
            .set::<_, _, ()>(key, value)
            .await
            .map_err(|e| map_error(key, e))
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        // PX keeps sub-second TTLs; SETEX only takes whole seconds
        let millis = ttl.as_millis().max(1) as u64;
        debug!("SET {} PX {} ({} bytes)", key, millis, value.len());

        ::redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(millis)
            .query_async::<_, ()>(&mut self.connection())
            .await
            .map_err(|e| map_error(key, e))
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        debug!("INCR {}", key);
        self.connection()
            .incr::<_, _, i64>(key, 1)
            .await
            .map_err(|e| map_error(key, e))
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        debug!("RPUSH {} ({} bytes)", key, value.len());
        self.connection()
            .rpush::<_, _, usize>(key, value)
            .await
            .map_err(|e| map_error(key, e))
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        debug!("LRANGE {} {} {}", key, start, stop);
        self.connection()
            .lrange::<_, Vec<Vec<u8>>>(key, start, stop)
            .await
            .map_err(|e| map_error(key, e))
    }

    async fn flushdb(&self) -> Result<()> {
        debug!("FLUSHDB");
        ::redis::cmd("FLUSHDB")
            .query_async::<_, ()>(&mut self.connection())
            .await
            .map_err(|e| StoreError::Redis(format!("FLUSHDB failed: {}", e)))
    }

    async fn ping(&self) -> Result<()> {
        ::redis::cmd("PING")
            .query_async::<_, String>(&mut self.connection())
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Redis(format!("PING failed: {}", e)))
    }
}
