use anyhow::Result;
use log::debug;
use reqwest::Client;
use std::path::PathBuf;

use crate::asset::{AssetLayout, Platform};
use crate::http::HttpClient;

/// Where OpenTUI publishes its release assets.
pub const DEFAULT_RELEASE_URL: &str = "https://github.com/sst/opentui/releases/download";

/// Release tag assets are fetched from. Only the latest release is supported.
pub const RELEASE_TAG: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory the header and `lib/` tree are placed under
    pub base_dir: PathBuf,
    /// Release download base, without the tag
    pub release_url: String,
    pub platform: Platform,
    /// Also fetch `opentui.h`
    pub include_header: bool,
}

impl Config {
    /// Configuration for the host platform with the published release location.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            release_url: DEFAULT_RELEASE_URL.to_string(),
            platform: Platform::detect(),
            include_header: true,
        }
    }

    pub fn with_release_url(mut self, release_url: Option<String>) -> Self {
        if let Some(url) = release_url {
            self.release_url = url;
        }
        self
    }

    pub fn with_platform(mut self, platform: Option<Platform>) -> Self {
        if let Some(platform) = platform {
            self.platform = platform;
        }
        self
    }

    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }

    pub fn layout(&self) -> AssetLayout {
        AssetLayout::new(&self.base_dir)
    }

    /// `{release_url}/latest/download/{asset}`
    pub fn asset_url(&self, asset: &str) -> String {
        format!(
            "{}/{}/download/{}",
            self.release_url.trim_end_matches('/'),
            RELEASE_TAG,
            asset
        )
    }

    /// Builds the HTTP client used for release downloads.
    ///
    /// No timeout is set, so a stalled host blocks the download indefinitely.
    pub fn http_client(&self) -> Result<HttpClient> {
        let user_agent = format!("opentui-fetch/{}", env!("OPENTUI_FETCH_VERSION"));
        debug!("Using user agent {}", user_agent);

        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(HttpClient::new(client))
    }
}
