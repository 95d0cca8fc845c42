//! Log stats command - Request statistics of the nginx log collection

use crate::stores;
use anyhow::{Context, Result};
use storekit_docs::LogStats;

pub async fn stats(top_ips: bool) -> Result<()> {
    let settings = stores::settings()?;
    let collection = stores::logs(&settings).await?;

    let stats = LogStats::collect(&collection, top_ips)
        .await
        .context("Failed to collect log statistics")?;
    print!("{}", stats);
    Ok(())
}
