//! Store handles opened from settings

use anyhow::{Context, Result};
use std::sync::Arc;
use storekit_core::{KeyValueStore, Settings, SettingsManager};
use storekit_storage::{HttpFetcher, MongoCollection, RedisStore};

pub fn settings() -> Result<Settings> {
    SettingsManager::load().context("Failed to load settings")
}

pub async fn redis(settings: &Settings) -> Result<Arc<dyn KeyValueStore>> {
    let store = RedisStore::connect(&settings.redis_url)
        .await
        .with_context(|| format!("Failed to connect to Redis at {}", settings.redis_url))?;
    Ok(Arc::new(store))
}

pub async fn schools(settings: &Settings) -> Result<MongoCollection> {
    MongoCollection::connect(
        &settings.mongo_uri,
        &settings.schools_database,
        &settings.schools_collection,
    )
    .await
    .with_context(|| format!("Failed to open MongoDB at {}", settings.mongo_uri))
}

pub async fn logs(settings: &Settings) -> Result<MongoCollection> {
    MongoCollection::connect(
        &settings.mongo_uri,
        &settings.logs_database,
        &settings.logs_collection,
    )
    .await
    .with_context(|| format!("Failed to open MongoDB at {}", settings.mongo_uri))
}

pub fn fetcher(settings: &Settings) -> Result<HttpFetcher> {
    HttpFetcher::new(settings.http_timeout()).context("Failed to create HTTP client")
}
