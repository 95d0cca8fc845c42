//! Expiring page cache with a visit counter

use std::sync::Arc;
use std::time::Duration;
use storekit_core::{KeyValueStore, PageFetcher, Result, StoreError};
use tracing::{debug, warn};

/// How long a fetched page stays cached
pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(10);

/// Visit counters live under `count:{url}` and never expire
pub const VISIT_COUNT_PREFIX: &str = "count:";

pub struct PageCache {
    store: Arc<dyn KeyValueStore>,
    fetcher: Arc<dyn PageFetcher>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(store: Arc<dyn KeyValueStore>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            store,
            fetcher,
            ttl: DEFAULT_PAGE_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Body of `url`, served from the cache while it is fresh.
    ///
    /// Every call counts a visit. A non-200 response or a failed fetch yields
    /// an empty string and caches nothing; store failures are returned.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        let visits = self.store.incr(&visit_key(url)).await?;
        debug!("{} visit #{}", url, visits);

        if let Some(cached) = self.store.get(url).await? {
            if !cached.is_empty() {
                debug!("Cache hit for {}", url);
                return Ok(String::from_utf8_lossy(&cached).into_owned());
            }
        }

        match self.fetcher.fetch(url).await {
            Ok(page) if page.is_ok() => {
                self.store.set_ex(url, page.body.as_bytes(), self.ttl).await?;
                Ok(page.body)
            }
            Ok(page) => {
                warn!("Not caching {}: status {}", url, page.status);
                Ok(String::new())
            }
            Err(e) => {
                warn!("Fetching {} failed: {}", url, e);
                Ok(String::new())
            }
        }
    }

    /// Number of `get_page` calls made for `url`
    pub async fn visit_count(&self, url: &str) -> Result<u64> {
        let key = visit_key(url);
        match self.store.get(&key).await? {
            Some(bytes) => std::str::from_utf8(&bytes)
                .ok()
                .and_then(|text| text.parse::<u64>().ok())
                .ok_or(StoreError::NotAnInteger(key)),
            None => Ok(0),
        }
    }
}

fn visit_key(url: &str) -> String {
    format!("{}{}", VISIT_COUNT_PREFIX, url)
}
