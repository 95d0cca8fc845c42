//! Cache command - Call-tracked value cache

use crate::stores;
use crate::ReadAs;
use anyhow::{Context, Result};
use colored::Colorize;
use storekit_cache::{Cache, StoreValue, STORE_METHOD};

/// Store each value and print its key
pub async fn store(values: &[String], int: bool, float: bool, fresh: bool) -> Result<()> {
    let settings = stores::settings()?;
    let backend = stores::redis(&settings).await?;

    let cache = if fresh {
        Cache::new(backend).await.context("Failed to flush the store")?
    } else {
        Cache::attach(backend)
    };

    for raw in values {
        let value = parse_value(raw, int, float)?;
        let key = cache.store(value).await.context("Failed to store value")?;
        println!("{}", key);
    }
    Ok(())
}

pub async fn get(key: &str, read_as: ReadAs) -> Result<()> {
    let settings = stores::settings()?;
    let cache = Cache::attach(stores::redis(&settings).await?);

    let rendered = match read_as {
        ReadAs::Str => cache.get_str(key).await?,
        ReadAs::Int => cache.get_int(key).await?.map(|n| n.to_string()),
        ReadAs::Raw => cache
            .get(key)
            .await?
            .map(|bytes| format!("{:?}", String::from_utf8_lossy(&bytes))),
    };

    match rendered {
        Some(value) => println!("{}", value),
        None => println!("{} {} is not set", "✗".red(), key),
    }
    Ok(())
}

pub async fn replay() -> Result<()> {
    let settings = stores::settings()?;
    let cache = Cache::attach(stores::redis(&settings).await?);

    let history = cache
        .replay(STORE_METHOD)
        .await
        .context("Failed to read call history")?;
    print!("{}", history);
    Ok(())
}

fn parse_value(raw: &str, int: bool, float: bool) -> Result<StoreValue> {
    if int {
        let n = raw
            .parse::<i64>()
            .with_context(|| format!("{:?} is not an integer", raw))?;
        return Ok(StoreValue::Int(n));
    }
    if float {
        let n = raw
            .parse::<f64>()
            .with_context(|| format!("{:?} is not a float", raw))?;
        return Ok(StoreValue::Float(n));
    }
    Ok(StoreValue::Str(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() -> Result<()> {
        assert_eq!(parse_value("42", false, false)?, StoreValue::Str("42".to_string()));
        assert_eq!(parse_value("42", true, false)?, StoreValue::Int(42));
        assert_eq!(parse_value("2.5", false, true)?, StoreValue::Float(2.5));
        assert!(parse_value("abc", true, false).is_err());
        Ok(())
    }
}
