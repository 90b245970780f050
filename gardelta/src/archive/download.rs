//! HTTP download of the delta archive.
//!
//! A plain GET streamed to a local file. The registry endpoint publishes a
//! single zip per delta, so there is no resume or multi-part handling here.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;

use super::error::{ArchiveError, ArchiveResult};
use super::traits::ArchiveFetcher;

/// Default timeout for HTTP requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 300; // 5 minutes

/// Buffer size for streaming the response body to disk (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// HTTP-based archive downloader.
#[derive(Debug)]
pub struct HttpDownloader {
    client: Client,
    pub(crate) timeout: Duration,
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpDownloader {
    /// Create a new HTTP downloader with default settings.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new HTTP downloader with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, timeout }
    }

    /// Stream the response body for `url` into `dest`.
    fn fetch_to_file(&self, url: &str, dest: &Path) -> ArchiveResult<u64> {
        let mut response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                ArchiveError::Timeout {
                    url: url.to_string(),
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                ArchiveError::DownloadFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArchiveError::DownloadFailed {
                url: url.to_string(),
                reason: format!("GET request failed with status {}", status),
            });
        }

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ArchiveError::CreateDirFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let file = File::create(dest).map_err(|e| ArchiveError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut downloaded = 0u64;

        loop {
            let bytes_read = response
                .read(&mut buffer)
                .map_err(|e| ArchiveError::DownloadFailed {
                    url: url.to_string(),
                    reason: format!("Read error: {}", e),
                })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| ArchiveError::WriteFailed {
                    path: dest.to_path_buf(),
                    source: e,
                })?;

            downloaded += bytes_read as u64;
        }

        writer.flush().map_err(|e| ArchiveError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        Ok(downloaded)
    }
}

impl ArchiveFetcher for HttpDownloader {
    fn fetch(&self, url: &str, dest: &Path) -> ArchiveResult<u64> {
        self.fetch_to_file(url, dest)
    }
}
