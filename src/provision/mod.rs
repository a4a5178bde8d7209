//! One-time provisioning of the OpenTUI native library and header.
//!
//! A [`Provisioner`] is owned by whatever hosts the binding. Its first
//! [`ensure`](Provisioner::ensure) call does the work; every later or
//! concurrent call gets the memoized outcome of that first attempt, whether
//! it succeeded or failed. Nothing is re-checked after that, even if the
//! files disappear from disk.

use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::OnceCell;

use crate::asset::{HEADER_FILE_NAME, asset_file_name};
use crate::config::Config;
use crate::download::{Download, HttpDownloader};
use crate::error::ProvisionError;
use crate::runtime::{RealRuntime, Runtime};

/// Where a provisioning attempt stands within this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionState {
    Unattempted,
    InProgress,
    Succeeded,
    Failed,
}

/// Whether the assets were found on disk or fetched by this attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSource {
    Cached,
    Downloaded,
}

/// Local paths of the provisioned assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assets {
    pub library: PathBuf,
    pub header: Option<PathBuf>,
    pub source: AssetSource,
}

pub struct Provisioner<R: Runtime, D: Download> {
    runtime: Arc<R>,
    downloader: D,
    config: Config,
    started: AtomicBool,
    outcome: OnceCell<Result<Assets, ProvisionError>>,
}

impl Provisioner<RealRuntime, HttpDownloader<RealRuntime>> {
    /// Provisioner backed by the real file system and an HTTP downloader.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let runtime = Arc::new(RealRuntime);
        let downloader = HttpDownloader::new(Arc::clone(&runtime), config.http_client()?);
        Ok(Self::new(runtime, downloader, config))
    }
}

impl<R: Runtime, D: Download> Provisioner<R, D> {
    pub fn new(runtime: Arc<R>, downloader: D, config: Config) -> Self {
        Self {
            runtime,
            downloader,
            config,
            started: AtomicBool::new(false),
            outcome: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> ProvisionState {
        match self.outcome.get() {
            Some(Ok(_)) => ProvisionState::Succeeded,
            Some(Err(_)) => ProvisionState::Failed,
            None if self.started.load(Ordering::SeqCst) => ProvisionState::InProgress,
            None => ProvisionState::Unattempted,
        }
    }

    /// Makes sure the assets exist locally, downloading them on first use.
    ///
    /// Runs at most once per provisioner. Concurrent callers wait for the
    /// single attempt and all observe its outcome.
    pub async fn ensure(&self) -> Result<Assets, ProvisionError> {
        self.outcome
            .get_or_init(|| async {
                let _attempt = AttemptGuard::start(&self.started);
                let result = self.provision().await;
                match &result {
                    Ok(assets) => debug!("OpenTUI assets ready: {:?}", assets),
                    Err(e) => error!("Provisioning OpenTUI assets failed: {}", e),
                }
                result
            })
            .await
            .clone()
    }

    /// Like [`ensure`](Self::ensure), for initializers that cannot continue
    /// without the native library.
    ///
    /// # Panics
    ///
    /// Panics with the underlying cause when provisioning fails.
    pub async fn ensure_or_abort(&self) -> Assets {
        match self.ensure().await {
            Ok(assets) => assets,
            Err(e) => panic!("Failed to download OpenTUI assets: {}", e),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn provision(&self) -> Result<Assets, ProvisionError> {
        let platform = &self.config.platform;
        if !platform.is_supported() {
            return Err(ProvisionError::UnsupportedPlatform {
                platform: platform.to_string(),
            });
        }

        let layout = self.config.layout();
        let library = layout.library_path(platform);
        let header = self.config.include_header.then(|| layout.header_path());

        // The library alone decides a cache hit; its contents are never checked
        if self.runtime.exists(&library) {
            info!("OpenTUI assets already present at {:?}", layout.base_dir());
            return Ok(Assets {
                library,
                header: header.filter(|path| self.runtime.exists(path)),
                source: AssetSource::Cached,
            });
        }

        let missing_header = header.as_ref().filter(|path| !self.runtime.exists(path));

        for dir in layout.platform_dirs() {
            self.runtime
                .create_dir_all(&dir)
                .map_err(|e| ProvisionError::CreateDir {
                    path: dir.clone(),
                    reason: format!("{:#}", e),
                })?;
        }

        if let Some(header_path) = missing_header {
            self.fetch("header", HEADER_FILE_NAME, header_path).await?;
        }

        debug!("Fetching library for {}", platform);
        self.fetch(
            &format!("library for {}", platform),
            &asset_file_name(platform),
            &library,
        )
        .await?;

        Ok(Assets {
            library,
            header,
            source: AssetSource::Downloaded,
        })
    }

    async fn fetch(&self, what: &str, asset: &str, dest: &Path) -> Result<u64, ProvisionError> {
        let url = self.config.asset_url(asset);
        self.downloader
            .download(&url, dest)
            .await
            .map_err(|cause| ProvisionError::Fetch {
                what: what.to_string(),
                cause: Box::new(cause),
            })
    }
}

/// Marks an attempt as running until it finishes or its future is dropped.
struct AttemptGuard<'a> {
    started: &'a AtomicBool,
}

impl<'a> AttemptGuard<'a> {
    fn start(started: &'a AtomicBool) -> Self {
        started.store(true, Ordering::SeqCst);
        Self { started }
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        self.started.store(false, Ordering::SeqCst);
    }
}
