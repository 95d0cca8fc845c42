//! HTTP page fetcher

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use storekit_core::{FetchedPage, PageFetcher, Result, StoreError};
use tracing::debug;

#[derive(Clone)]
pub struct HttpFetcher {
    http: ReqwestClient,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Http(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Http(format!("Failed to read body of {}: {}", url, e)))?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(FetchedPage::new(status, body))
    }
}
