//! Outbound page fetch port

use crate::Result;
use async_trait::async_trait;

/// Response of a page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`. Transport failures are errors; HTTP error statuses are not.
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}
