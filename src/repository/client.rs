// src/repository/client.rs

//! HTTP client for repository operations
//!
//! Provides a wrapper around reqwest with retry support for fetching
//! POMs and metadata, probing artifacts and downloading files.

use crate::error::{Error, Result};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use url::Url;

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum retry attempts for failed requests
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// HTTP client wrapper with retry support
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Send a request, retrying transport errors
    ///
    /// HTTP error statuses are returned to the caller, not retried.
    fn send_with_retry<F>(&self, url: &Url, send: F) -> Result<Response>
    where
        F: Fn(&Client) -> reqwest::Result<Response>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match send(&self.client) {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::DownloadError(format!(
                            "Request to {url} failed after {attempt} attempts: {e}"
                        )));
                    }
                    warn!("Request attempt {} to {} failed: {}, retrying...", attempt, url, e);
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                }
            }
        }
    }

    /// Fetch a text document
    ///
    /// Returns `None` for client errors; some repositories answer 401 or 403
    /// instead of 404 for paths they do not host.
    pub fn fetch_text(&self, url: &Url) -> Result<Option<String>> {
        debug!("Fetching {}", url);
        let response = self.send_with_retry(url, |c| c.get(url.clone()).send())?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if status.is_client_error() => {
                debug!("HTTP {} from {}, treating as absent", status, url);
                return Ok(None);
            }
            status if !status.is_success() => {
                return Err(Error::DownloadError(format!("HTTP {} from {}", status, url)));
            }
            _ => {}
        }

        response
            .text()
            .map(Some)
            .map_err(|e| Error::DownloadError(format!("Failed to read response from {}: {}", url, e)))
    }

    /// Check whether a URL exists using a HEAD request
    pub fn exists(&self, url: &Url) -> Result<bool> {
        let response = self.send_with_retry(url, |c| c.head(url.clone()).send())?;
        let status = response.status();
        debug!("HEAD {} -> {}", url, status);

        if status.is_success() {
            Ok(true)
        } else if status.is_client_error() {
            Ok(false)
        } else {
            Err(Error::DownloadError(format!("HTTP {} from {}", status, url)))
        }
    }

    /// Download a file to the specified path with retry support
    ///
    /// The body is written to a temporary file in the destination directory
    /// and renamed into place once complete.
    pub fn download_file(&self, url: &Url, dest_path: &Path) -> Result<()> {
        info!("Downloading {} to {}", url, dest_path.display());

        let parent = dest_path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| {
            Error::IoError(format!("Failed to create directory {}: {e}", parent.display()))
        })?;

        let mut response = self.send_with_retry(url, |c| c.get(url.clone()).send())?;
        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| {
            Error::IoError(format!("Failed to create temp file in {}: {e}", parent.display()))
        })?;

        let downloaded = io::copy(&mut response, temp.as_file_mut())
            .map_err(|e| Error::IoError(format!("Failed to write downloaded data: {e}")))?;

        temp.persist(dest_path).map_err(|e| {
            Error::IoError(format!("Failed to move download to {}: {}", dest_path.display(), e))
        })?;

        info!("Downloaded {} bytes to {}", downloaded, dest_path.display());
        Ok(())
    }
}
