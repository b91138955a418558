//! File downloads with atomic placement.
//!
//! The body is streamed into `<destination>.part` and renamed over the
//! destination only once the whole response has been written, so an
//! interrupted download never leaves a truncated image in place.

use crate::config::NetworkConfig;
use crate::network::client::HttpClient;
use crate::{Result, ShelfError};
use futures::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Download manager for artwork files.
pub struct DownloadManager {
    http: Arc<HttpClient>,
    /// Temp file suffix.
    temp_suffix: String,
}

impl DownloadManager {
    /// Create a new download manager.
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(Arc::new(HttpClient::new()?)))
    }

    /// Create a download manager with custom HTTP client.
    pub fn with_client(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            temp_suffix: NetworkConfig::DOWNLOAD_TEMP_SUFFIX.to_string(),
        }
    }

    /// Download `url` to `destination`, replacing any existing file.
    ///
    /// Returns the number of bytes written.
    pub async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        // Ensure parent directory exists
        if let Some(parent) = destination.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| ShelfError::Io {
                    message: format!("Failed to create directory: {}", e),
                    path: Some(parent.to_path_buf()),
                    source: Some(e),
                })?;
            }
        }

        let temp_path = self.temp_path(destination);

        match self.do_download(url, &temp_path).await {
            Ok(bytes) => {
                std::fs::rename(&temp_path, destination).map_err(|e| {
                    let _ = std::fs::remove_file(&temp_path);
                    ShelfError::Io {
                        message: format!("Failed to move download to final destination: {}", e),
                        path: Some(destination.to_path_buf()),
                        source: Some(e),
                    }
                })?;

                info!("Downloaded {} bytes to {}", bytes, destination.display());
                Ok(bytes)
            }
            Err(e) => {
                // Cleanup temp file on error
                let _ = std::fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }

    fn temp_path(&self, destination: &Path) -> PathBuf {
        let mut name = destination.as_os_str().to_owned();
        name.push(&self.temp_suffix);
        PathBuf::from(name)
    }

    async fn do_download(&self, url: &str, temp_path: &Path) -> Result<u64> {
        let response = self.http.get(url).await?;

        let mut file = std::fs::File::create(temp_path).map_err(|e| ShelfError::Io {
            message: format!("Failed to create temp file: {}", e),
            path: Some(temp_path.to_path_buf()),
            source: Some(e),
        })?;

        let mut bytes_downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| ShelfError::Network {
                message: format!("Error reading download stream: {}", e),
                source: Some(e),
            })?;

            file.write_all(&chunk).map_err(|e| ShelfError::Io {
                message: format!("Failed to write to temp file: {}", e),
                path: Some(temp_path.to_path_buf()),
                source: Some(e),
            })?;

            bytes_downloaded += chunk.len() as u64;
        }

        file.sync_all().map_err(|e| ShelfError::Io {
            message: format!("Failed to flush temp file: {}", e),
            path: Some(temp_path.to_path_buf()),
            source: Some(e),
        })?;

        debug!("Fetched {} bytes from {}", bytes_downloaded, url);
        Ok(bytes_downloaded)
    }
}
