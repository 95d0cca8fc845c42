//! Web command - Expiring page cache

use crate::stores;
use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;
use storekit_cache::PageCache;

pub async fn get(url: &str) -> Result<()> {
    let pages = page_cache().await?;

    let page = pages
        .get_page(url)
        .await
        .with_context(|| format!("Failed to get page {}", url))?;
    if page.is_empty() {
        eprintln!("{} No content for {}", "✗".red(), url);
    } else {
        println!("{}", page);
    }
    Ok(())
}

pub async fn count(url: &str) -> Result<()> {
    let pages = page_cache().await?;

    let visits = pages.visit_count(url).await?;
    println!("{} {}", url.cyan(), visits);
    Ok(())
}

async fn page_cache() -> Result<PageCache> {
    let settings = stores::settings()?;
    let store = stores::redis(&settings).await?;
    let fetcher = Arc::new(stores::fetcher(&settings)?);

    Ok(PageCache::new(store, fetcher).with_ttl(settings.page_ttl()))
}
