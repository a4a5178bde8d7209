//! HTTP client that streams a release asset to a writer.

use log::debug;
use reqwest::{Client, StatusCode};
use std::io::Write;
use std::path::Path;

use crate::error::ProvisionError;

/// HTTP client for fetching release assets.
///
/// Every request is a single attempt: no retry, no timeout, and reqwest's
/// default redirect policy (GitHub answers release downloads with a redirect).
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Downloads `url` into the writer returned by `create_writer`.
    ///
    /// The writer is only created once the host has answered 200, so a
    /// rejected request never touches the file system. `dest` names the
    /// file being written, for error messages.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(
        &self,
        url: &str,
        dest: &Path,
        create_writer: F,
    ) -> Result<u64, ProvisionError>
    where
        W: Write,
        F: FnOnce() -> Result<W, ProvisionError>,
    {
        debug!("Downloading file from {}...", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProvisionError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let expected_bytes = response.content_length();
        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        loop {
            let chunk = match response.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                // hyper enforces Content-Length: a body that ends early surfaces here
                Err(e) => match expected_bytes {
                    Some(expected) if downloaded_bytes < expected => {
                        debug!("Body stream broke after {} bytes: {}", downloaded_bytes, e);
                        return Err(ProvisionError::Truncated {
                            url: url.to_string(),
                            expected,
                            received: downloaded_bytes,
                        });
                    }
                    _ => return Err(network_error(url, e)),
                },
            };
            writer
                .write_all(&chunk)
                .map_err(|e| write_error(dest, e))?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().map_err(|e| write_error(dest, e))?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}

fn network_error(url: &str, error: reqwest::Error) -> ProvisionError {
    ProvisionError::Network {
        url: url.to_string(),
        reason: format!("{:#}", anyhow::Error::from(error)),
    }
}

fn write_error(dest: &Path, error: std::io::Error) -> ProvisionError {
    ProvisionError::Write {
        path: dest.to_path_buf(),
        reason: error.to_string(),
    }
}
