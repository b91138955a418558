//! Remote image fetching.

use crate::network::DownloadManager;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;

/// Fetches a URL into a file, replacing whatever is there.
///
/// Callers decide whether a fetch is needed; implementations always fetch.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<()>;
}

/// Fetcher backed by the HTTP download manager.
pub struct HttpFetcher {
    downloads: DownloadManager,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            downloads: DownloadManager::new()?,
        })
    }

    pub fn with_manager(downloads: DownloadManager) -> Self {
        Self { downloads }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        self.downloads.download(url, destination).await?;
        Ok(())
    }
}
