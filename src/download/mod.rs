use crate::error::ProvisionError;
use crate::http::HttpClient;
use crate::runtime::Runtime;
use async_trait::async_trait;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Fetches one release asset to a local file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Download: Send + Sync {
    /// Downloads `url` to `dest`, returning the number of bytes written.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, ProvisionError>;
}

/// Downloads over HTTP and writes through a [`Runtime`].
///
/// The body goes to `<dest>.part` first and is renamed into place once the
/// stream completes, so an interrupted download never looks like a finished one.
pub struct HttpDownloader<R: Runtime> {
    runtime: Arc<R>,
    http_client: HttpClient,
}

impl<R: Runtime> HttpDownloader<R> {
    pub fn new(runtime: Arc<R>, http_client: HttpClient) -> Self {
        Self {
            runtime,
            http_client,
        }
    }
}

#[async_trait]
impl<R: Runtime> Download for HttpDownloader<R> {
    #[tracing::instrument(skip(self))]
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, ProvisionError> {
        info!("Downloading {}...", url);

        let part_path = partial_path(dest);
        let writer_created = AtomicBool::new(false);
        let runtime = &self.runtime;

        let result = self
            .http_client
            .download_file(url, dest, || {
                if let Some(parent) = part_path.parent() {
                    runtime
                        .create_dir_all(parent)
                        .map_err(|e| ProvisionError::CreateDir {
                            path: parent.to_path_buf(),
                            reason: format!("{:#}", e),
                        })?;
                }
                let writer =
                    runtime
                        .create_file(&part_path)
                        .map_err(|e| ProvisionError::Write {
                            path: part_path.clone(),
                            reason: format!("{:#}", e),
                        })?;
                writer_created.store(true, Ordering::SeqCst);
                Ok(writer)
            })
            .await;

        let result = result.and_then(|bytes| {
            runtime
                .rename(&part_path, dest)
                .map_err(|e| ProvisionError::Write {
                    path: dest.to_path_buf(),
                    reason: format!("{:#}", e),
                })?;
            Ok(bytes)
        });

        match result {
            Ok(bytes) => {
                info!("Saved {:?} ({} bytes).", dest, bytes);
                Ok(bytes)
            }
            Err(e) => {
                if writer_created.load(Ordering::SeqCst) && runtime.exists(&part_path) {
                    if let Err(cleanup_err) = runtime.remove_file(&part_path) {
                        warn!(
                            "Failed to remove partial download {:?}: {:#}",
                            part_path, cleanup_err
                        );
                    }
                }
                Err(e)
            }
        }
    }
}

/// `lib/x86_64-linux/libopentui.so` -> `lib/x86_64-linux/libopentui.so.part`
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use reqwest::Client;
    use tempfile::tempdir;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("lib/x86_64-linux/libopentui.so")),
            Path::new("lib/x86_64-linux/libopentui.so.part")
        );
        assert_eq!(partial_path(Path::new("opentui.h")), Path::new("opentui.h.part"));
    }

    #[tokio::test]
    async fn test_download_writes_part_then_renames() {
        // --- Setup Mock Server ---
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/libopentui.so")
            .with_status(200)
            .with_body("test content")
            .create_async()
            .await;

        // --- Setup Runtime ---
        let dest = PathBuf::from("lib/x86_64-linux/libopentui.so");
        let part = PathBuf::from("lib/x86_64-linux/libopentui.so.part");
        let mut runtime = MockRuntime::new();

        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("lib/x86_64-linux")))
            .times(1)
            .returning(|_| Ok(()));

        runtime
            .expect_create_file()
            .with(eq(part.clone()))
            .times(1)
            .returning(|_| Ok(Box::new(std::io::sink())));

        runtime
            .expect_rename()
            .with(eq(part.clone()), eq(dest.clone()))
            .times(1)
            .returning(|_, _| Ok(()));

        // --- Execute ---
        let downloader = HttpDownloader::new(Arc::new(runtime), HttpClient::new(Client::new()));
        let bytes = downloader
            .download(&format!("{}/libopentui.so", url), &dest)
            .await
            .unwrap();

        // --- Verify ---
        mock.assert_async().await;
        assert_eq!(bytes, 12);
    }

    #[tokio::test]
    async fn test_download_not_found_touches_nothing() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/libopentui.so")
            .with_status(404)
            .create_async()
            .await;

        // No expectations = strict mode (panics if any method called)
        let runtime = MockRuntime::new();

        let downloader = HttpDownloader::new(Arc::new(runtime), HttpClient::new(Client::new()));
        let result = downloader
            .download(
                &format!("{}/libopentui.so", url),
                Path::new("lib/x86_64-linux/libopentui.so"),
            )
            .await;

        mock.assert_async().await;
        assert_eq!(result.unwrap_err().status(), Some(404));
    }

    #[tokio::test]
    async fn test_download_real_runtime_creates_parents() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/opentui.h")
            .with_status(200)
            .with_body("#pragma once\n")
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("nested/include/opentui.h");

        let downloader = HttpDownloader::new(Arc::new(RealRuntime), HttpClient::new(Client::new()));
        downloader
            .download(&format!("{}/opentui.h", url), &dest)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "#pragma once\n");
        assert!(!partial_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_download_failed_rename_removes_part_file() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/opentui.h")
            .with_status(200)
            .with_body("header")
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        // A directory at the destination makes the final rename fail
        let dest = dir.path().join("opentui.h");
        std::fs::create_dir_all(dest.join("occupied")).unwrap();

        let downloader = HttpDownloader::new(Arc::new(RealRuntime), HttpClient::new(Client::new()));
        let result = downloader
            .download(&format!("{}/opentui.h", url), &dest)
            .await;

        assert!(matches!(result, Err(ProvisionError::Write { .. })));
        assert!(!partial_path(&dest).exists());
    }
}
