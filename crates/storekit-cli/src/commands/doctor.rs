//! Doctor command - Connectivity diagnostics

use crate::stores;
use anyhow::Result;
use colored::Colorize;
use storekit_core::DocumentCollection;

pub async fn execute() -> Result<()> {
    println!("{}", "🔍 Storekit Diagnostics".blue().bold());
    println!();

    let settings = stores::settings()?;

    println!("{}", "Redis:".cyan());
    match stores::redis(&settings).await {
        Ok(store) => report(&settings.redis_url, store.ping().await),
        Err(e) => report_error(&settings.redis_url, &e),
    }
    println!();

    println!("{}", "MongoDB:".cyan());
    match stores::logs(&settings).await {
        Ok(collection) => report(&settings.mongo_uri, collection.ping().await),
        Err(e) => report_error(&settings.mongo_uri, &e),
    }
    println!();

    println!("{}", "Done!".green().bold());
    Ok(())
}

fn report(target: &str, result: storekit_core::Result<()>) {
    match result {
        Ok(()) => println!("   {} {}", "✓".green(), target),
        Err(e) => println!("   {} {} - {}", "✗".red(), target, e.to_string().red()),
    }
}

fn report_error(target: &str, error: &anyhow::Error) {
    println!("   {} {} - {}", "✗".red(), target, format!("{:#}", error).red());
}
