//! Value cache with call tracking

use crate::instrument::{call_history, count_calls, MethodKeys};
use crate::value::StoreValue;
use std::fmt;
use std::sync::Arc;
use storekit_core::{KeyValueStore, Result, StoreError};
use tracing::debug;
use uuid::Uuid;

/// Qualified name under which [`Cache::store`] calls are recorded
pub const STORE_METHOD: &str = "Cache::store";

/// Stores scalar values under random keys.
///
/// The cache owns its store handle and starts from an empty database.
/// Single writer per store is assumed; nothing is locked.
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
}

impl Cache {
    /// Take the store handle and flush it
    pub async fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        store.flushdb().await?;
        Ok(Self { store })
    }

    /// Reuse a store that already holds cached values and call history
    pub fn attach(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Store `data` under a fresh UUID key and return the key.
    ///
    /// Every call is counted and its input and output are appended to the
    /// history lists of [`STORE_METHOD`].
    pub async fn store(&self, data: impl Into<StoreValue>) -> Result<String> {
        let data = data.into();
        let input = data.literal();
        let store = self.store.as_ref();

        call_history(
            store,
            STORE_METHOD,
            &input,
            count_calls(store, STORE_METHOD, self.write_new(data)),
        )
        .await
    }

    async fn write_new(&self, data: StoreValue) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, &data.to_bytes()).await?;
        debug!("Stored {} under {}", data, key);
        Ok(key)
    }

    /// Raw bytes stored at `key`
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Read `key` and convert the stored bytes with `convert`
    pub async fn get_with<T, F>(&self, key: &str, convert: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.store.get(key).await?.map(convert).transpose()
    }

    /// Read `key` as UTF-8 text
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, |bytes| {
            String::from_utf8(bytes).map_err(|e| StoreError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .await
    }

    /// Read `key` as a decimal integer
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |bytes| {
            std::str::from_utf8(&bytes)
                .ok()
                .and_then(|text| text.parse::<i64>().ok())
                .ok_or_else(|| StoreError::InvalidValue {
                    key: key.to_string(),
                    message: format!("not an integer: {:?}", String::from_utf8_lossy(&bytes)),
                })
        })
        .await
    }

    pub async fn set(&self, key: &str, value: impl Into<StoreValue>) -> Result<()> {
        self.store.set(key, &value.into().to_bytes()).await
    }

    pub async fn incr(&self, key: &str) -> Result<i64> {
        self.store.incr(key).await
    }

    pub async fn rpush(&self, key: &str, value: impl Into<StoreValue>) -> Result<usize> {
        self.store.rpush(key, &value.into().to_bytes()).await
    }

    /// History of `method` calls recorded in this cache's store
    pub async fn replay(&self, method: &str) -> Result<CallHistory> {
        replay(self.store.as_ref(), method).await
    }
}

/// Recorded calls of one method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallHistory {
    pub method: String,
    pub count: u64,
    /// (input, output) pairs in call order
    pub calls: Vec<(String, String)>,
}

impl fmt::Display for CallHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.method, self.count)?;
        for (input, output) in &self.calls {
            writeln!(f, "{}({}) -> {}", self.method, input, output)?;
        }
        Ok(())
    }
}

/// Read back the counter and history lists of `method`.
///
/// A method never called replays as zero calls. Inputs and outputs are
/// paired by position; an unmatched trailing input is left out.
pub async fn replay(store: &dyn KeyValueStore, method: &str) -> Result<CallHistory> {
    let keys = MethodKeys::new(method);

    let count = match store.get(&keys.calls).await? {
        Some(bytes) => std::str::from_utf8(&bytes)
            .ok()
            .and_then(|text| text.parse::<u64>().ok())
            .ok_or_else(|| StoreError::NotAnInteger(keys.calls.clone()))?,
        None => 0,
    };

    let inputs = store.lrange(&keys.inputs, 0, -1).await?;
    let outputs = store.lrange(&keys.outputs, 0, -1).await?;

    let calls = inputs
        .iter()
        .zip(outputs.iter())
        .map(|(input, output)| {
            (
                String::from_utf8_lossy(input).into_owned(),
                String::from_utf8_lossy(output).into_owned(),
            )
        })
        .collect();

    Ok(CallHistory {
        method: method.to_string(),
        count,
        calls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use storekit_storage::MemoryStore;

    async fn cache() -> Result<(Cache, MemoryStore)> {
        let backend = MemoryStore::new();
        let cache = Cache::new(Arc::new(backend.clone())).await?;
        Ok((cache, backend))
    }

    #[tokio::test]
    async fn test_new_flushes_store() -> Result<()> {
        let backend = MemoryStore::new();
        backend.set("stale", b"1").await?;

        let _cache = Cache::new(Arc::new(backend.clone())).await?;
        assert_eq!(backend.get("stale").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_attach_keeps_history() -> Result<()> {
        let (cache, backend) = cache().await?;
        let key = cache.store("kept").await?;

        let reopened = Cache::attach(Arc::new(backend));
        assert_eq!(reopened.get_str(&key).await?, Some("kept".to_string()));
        assert_eq!(reopened.replay(STORE_METHOD).await?.count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_store_then_get() -> Result<()> {
        let (cache, _) = cache().await?;

        let key = cache.store(b"bar".to_vec()).await?;
        assert!(Uuid::parse_str(&key).is_ok());
        assert_eq!(cache.get(&key).await?, Some(b"bar".to_vec()));

        let key = cache.store(123).await?;
        assert_eq!(cache.get_int(&key).await?, Some(123));

        let key = cache.store("foo").await?;
        assert_eq!(cache.get_str(&key).await?, Some("foo".to_string()));
        assert_eq!(
            cache.get_with(&key, |bytes| Ok(bytes.len())).await?,
            Some(3)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_typed_reads() -> Result<()> {
        let (cache, _) = cache().await?;

        assert_eq!(cache.get_str("missing").await?, None);
        assert_eq!(cache.get_int("missing").await?, None);

        cache.set("text", "hello").await?;
        assert!(matches!(
            cache.get_int("text").await,
            Err(StoreError::InvalidValue { .. })
        ));

        cache.set("binary", vec![0xff_u8, 0xfe]).await?;
        assert!(cache.get_str("binary").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_whole_float_keeps_fraction() -> Result<()> {
        let (cache, _) = cache().await?;

        let key = cache.store(1.0_f64).await?;
        assert_eq!(cache.get_str(&key).await?, Some("1.0".to_string()));
        assert!(matches!(
            cache.get_int(&key).await,
            Err(StoreError::InvalidValue { .. })
        ));

        let history = cache.replay(STORE_METHOD).await?;
        assert_eq!(history.calls, vec![("1.0".to_string(), key)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_counter_increments_once_per_call() -> Result<()> {
        let (cache, backend) = cache().await?;

        for expected in 1..=3_i64 {
            cache.store(expected).await?;
            assert_eq!(backend.get(STORE_METHOD).await?, Some(expected.to_string().into_bytes()));
        }

        // Other accessors are not tracked
        cache.set("plain", 1).await?;
        cache.get("plain").await?;
        assert_eq!(cache.replay(STORE_METHOD).await?.count, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_history_lists_stay_aligned() -> Result<()> {
        let (cache, backend) = cache().await?;

        let keys = vec![cache.store("first").await?, cache.store(2).await?];

        let method = MethodKeys::new(STORE_METHOD);
        let inputs = backend.lrange(&method.inputs, 0, -1).await?;
        let outputs = backend.lrange(&method.outputs, 0, -1).await?;

        assert_eq!(inputs, vec![b"\"first\"".to_vec(), b"2".to_vec()]);
        let outputs: Vec<String> = outputs
            .into_iter()
            .map(|o| String::from_utf8_lossy(&o).into_owned())
            .collect();
        assert_eq!(outputs, keys);
        Ok(())
    }

    #[tokio::test]
    async fn test_replay() -> Result<()> {
        let (cache, _) = cache().await?;

        let foo = cache.store("foo").await?;
        let bar = cache.store("bar").await?;
        let num = cache.store(42).await?;

        let history = cache.replay(STORE_METHOD).await?;
        assert_eq!(history.count, 3);

        let expected = format!(
            "Cache::store was called 3 times:\n\
             Cache::store(\"foo\") -> {}\n\
             Cache::store(\"bar\") -> {}\n\
             Cache::store(42) -> {}\n",
            foo, bar, num
        );
        assert_eq!(history.to_string(), expected);
        Ok(())
    }

    #[tokio::test]
    async fn test_replay_never_called() -> Result<()> {
        let (cache, _) = cache().await?;

        let history = cache.replay(STORE_METHOD).await?;
        assert_eq!(history.count, 0);
        assert!(history.calls.is_empty());
        assert_eq!(history.to_string(), "Cache::store was called 0 times:\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_pass_throughs() -> Result<()> {
        let (cache, backend) = cache().await?;

        assert_eq!(cache.incr("hits").await?, 1);
        assert_eq!(cache.incr("hits").await?, 2);
        assert_eq!(cache.get_int("hits").await?, Some(2));

        cache.rpush("queue", "a").await?;
        assert_eq!(cache.rpush("queue", 7).await?, 2);
        assert_eq!(
            backend.lrange("queue", 0, -1).await?,
            vec![b"a".to_vec(), b"7".to_vec()]
        );
        Ok(())
    }
}
