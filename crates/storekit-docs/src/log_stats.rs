//! Request statistics over an nginx access-log collection
//!
//! Each log document carries at least `method`, `path` and `ip`.

use std::fmt;
use storekit_core::{DocumentCollection, Filter, GroupCount, Result};
use tracing::debug;

/// Methods reported, in display order
pub const HTTP_METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

pub const TOP_IPS_LIMIT: i64 = 10;

/// Path probed by health checks
pub const STATUS_PATH: &str = "/status";

#[derive(Debug, Clone, PartialEq)]
pub struct LogStats {
    pub total: u64,
    /// Count per entry of [`HTTP_METHODS`], zeros included
    pub methods: Vec<(String, u64)>,
    /// `GET /status` requests
    pub status_checks: u64,
    pub top_ips: Option<Vec<GroupCount>>,
}

impl LogStats {
    /// Gather the statistics; the top-IP aggregation only runs when asked for.
    pub async fn collect(
        collection: &dyn DocumentCollection,
        include_top_ips: bool,
    ) -> Result<Self> {
        let total = collection.count_documents(&Filter::All).await?;

        let mut methods = Vec::with_capacity(HTTP_METHODS.len());
        for method in HTTP_METHODS {
            let count = collection
                .count_documents(&Filter::eq("method", method))
                .await?;
            methods.push((method.to_string(), count));
        }

        let status_checks = collection
            .count_documents(&Filter::and([
                Filter::eq("method", "GET"),
                Filter::eq("path", STATUS_PATH),
            ]))
            .await?;

        let top_ips = if include_top_ips {
            Some(collection.group_count("ip", TOP_IPS_LIMIT).await?)
        } else {
            None
        };

        debug!("Collected stats over {} logs", total);
        Ok(Self {
            total,
            methods,
            status_checks,
            top_ips,
        })
    }

    pub fn method_count(&self, method: &str) -> Option<u64> {
        self.methods
            .iter()
            .find(|(name, _)| name == method)
            .map(|(_, count)| *count)
    }
}

impl fmt::Display for LogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} logs", self.total)?;
        writeln!(f, "Methods:")?;
        for (method, count) in &self.methods {
            writeln!(f, "\tmethod {}: {}", method, count)?;
        }
        writeln!(f, "{} status check", self.status_checks)?;

        if let Some(top_ips) = &self.top_ips {
            writeln!(f, "IPs:")?;
            for group in top_ips {
                writeln!(f, "\t{}: {}", group.key_text(), group.count)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use storekit_storage::MemoryCollection;

    async fn seeded() -> Result<MemoryCollection> {
        let collection = MemoryCollection::new();
        let requests = [
            ("172.31.63.67", "GET", "/status"),
            ("172.31.63.67", "GET", "/status"),
            ("172.31.63.67", "GET", "/"),
            ("172.31.2.14", "POST", "/login"),
            ("172.31.2.14", "GET", "/status"),
            ("69.162.124.230", "DELETE", "/item/1"),
        ];
        for (ip, method, path) in requests {
            collection
                .insert_one(doc! { "ip": ip, "method": method, "path": path })
                .await?;
        }
        Ok(collection)
    }

    #[tokio::test]
    async fn test_collect_counts() -> Result<()> {
        let collection = seeded().await?;
        let stats = LogStats::collect(&collection, false).await?;

        assert_eq!(stats.total, 6);
        assert_eq!(stats.method_count("GET"), Some(4));
        assert_eq!(stats.method_count("POST"), Some(1));
        assert_eq!(stats.method_count("PUT"), Some(0));
        assert_eq!(stats.method_count("DELETE"), Some(1));
        assert_eq!(stats.status_checks, 3);
        assert!(stats.top_ips.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_display_without_ips() -> Result<()> {
        let collection = seeded().await?;
        let stats = LogStats::collect(&collection, false).await?;

        let expected = "6 logs\n\
                        Methods:\n\
                        \tmethod GET: 4\n\
                        \tmethod POST: 1\n\
                        \tmethod PUT: 0\n\
                        \tmethod PATCH: 0\n\
                        \tmethod DELETE: 1\n\
                        3 status check\n";
        assert_eq!(stats.to_string(), expected);
        Ok(())
    }

    #[tokio::test]
    async fn test_display_with_top_ips() -> Result<()> {
        let collection = seeded().await?;
        let stats = LogStats::collect(&collection, true).await?;

        let rendered = stats.to_string();
        assert!(rendered.ends_with(
            "IPs:\n\t172.31.63.67: 3\n\t172.31.2.14: 2\n\t69.162.124.230: 1\n"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_collection() -> Result<()> {
        let collection = MemoryCollection::new();
        let stats = LogStats::collect(&collection, true).await?;

        assert_eq!(stats.total, 0);
        assert!(stats.methods.iter().all(|(_, count)| *count == 0));
        assert_eq!(stats.top_ips, Some(Vec::new()));
        Ok(())
    }
}
