//! Config command - Manage storekit settings

use crate::stores;
use anyhow::{Context, Result};
use colored::Colorize;
use storekit_core::{Settings, SettingsManager};

/// Show the effective settings (defaults, file and environment combined)
pub async fn show() -> Result<()> {
    let settings = stores::settings()?;
    let path = SettingsManager::settings_path()?;

    println!("{}", "Storekit Configuration".bold().underline());
    println!();

    println!("{}", "Key-value store:".cyan().bold());
    println!("  Redis URL:       {}", settings.redis_url);
    println!("  Page TTL:        {}s", settings.page_ttl_secs);
    println!("  HTTP timeout:    {}s", settings.http_timeout_secs);
    println!();

    println!("{}", "Document store:".cyan().bold());
    println!("  MongoDB URI:     {}", settings.mongo_uri);
    println!(
        "  Schools:         {}.{}",
        settings.schools_database, settings.schools_collection
    );
    println!(
        "  Logs:            {}.{}",
        settings.logs_database, settings.logs_collection
    );
    println!();

    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not created, using defaults)", path.display())
    };
    println!("  Config file: {}", source.dimmed());

    Ok(())
}

pub async fn path() -> Result<()> {
    println!("{}", SettingsManager::settings_path()?.display());
    Ok(())
}

/// Write the default settings file
pub async fn init(force: bool) -> Result<()> {
    let path = SettingsManager::settings_path()?;
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    let path = SettingsManager::save(&Settings::default()).context("Failed to save settings")?;
    println!("{} Settings written to {}", "✓".green(), path.display().to_string().cyan());
    Ok(())
}
