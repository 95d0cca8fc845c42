//! Schools command - Query the school collection

use crate::stores;
use anyhow::{Context, Result};
use bson::{Bson, Document};
use colored::Colorize;
use storekit_docs::{insert_school, list_all, schools_by_topic};

pub async fn list() -> Result<()> {
    let settings = stores::settings()?;
    let collection = stores::schools(&settings).await?;

    let schools = list_all(&collection).await.context("Failed to list schools")?;
    print_documents(&schools)
}

pub async fn insert(fields: &[String]) -> Result<()> {
    let document = parse_fields(fields)?;

    let settings = stores::settings()?;
    let collection = stores::schools(&settings).await?;

    let id = insert_school(&collection, document)
        .await
        .context("Failed to insert school")?;
    println!("{} Inserted school {}", "✓".green(), id.to_string().cyan());
    Ok(())
}

pub async fn by_topic(topic: &str) -> Result<()> {
    let settings = stores::settings()?;
    let collection = stores::schools(&settings).await?;

    let schools = schools_by_topic(&collection, topic)
        .await
        .with_context(|| format!("Failed to query schools by topic {}", topic))?;
    print_documents(&schools)
}

fn print_documents(documents: &[Document]) -> Result<()> {
    for document in documents {
        let json = Bson::Document(document.clone()).into_relaxed_extjson();
        println!("{}", serde_json::to_string(&json)?);
    }
    Ok(())
}

/// Build a document from `KEY=VALUE` arguments.
///
/// Integers are stored as numbers; values containing commas become string arrays.
pub fn parse_fields(fields: &[String]) -> Result<Document> {
    let mut document = Document::new();
    for field in fields {
        let (key, value) = field
            .split_once('=')
            .with_context(|| format!("Invalid field {:?}: expected KEY=VALUE", field))?;
        if key.is_empty() {
            anyhow::bail!("Invalid field {:?}: empty key", field);
        }
        document.insert(key, parse_value(value));
    }
    Ok(document)
}

fn parse_value(value: &str) -> Bson {
    if let Ok(n) = value.parse::<i64>() {
        return Bson::Int64(n);
    }
    if value.contains(',') {
        return Bson::Array(
            value
                .split(',')
                .map(|item| Bson::String(item.trim().to_string()))
                .collect(),
        );
    }
    Bson::String(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_parse_fields() -> Result<()> {
        let fields = vec![
            "name=Holberton school".to_string(),
            "topics=C, Python".to_string(),
            "students=42".to_string(),
        ];
        assert_eq!(
            parse_fields(&fields)?,
            doc! { "name": "Holberton school", "topics": ["C", "Python"], "students": 42_i64 }
        );
        Ok(())
    }

    #[test]
    fn test_parse_fields_rejects_malformed() {
        assert!(parse_fields(&["name".to_string()]).is_err());
        assert!(parse_fields(&["=UCSF".to_string()]).is_err());
    }

    #[test]
    fn test_value_keeps_equals_signs() -> Result<()> {
        let document = parse_fields(&["url=http://a.example/?q=1".to_string()])?;
        assert_eq!(document.get_str("url").ok(), Some("http://a.example/?q=1"));
        Ok(())
    }
}
