use std::path::{Path, PathBuf};

use super::naming::{HEADER_FILE_NAME, local_file_name};
use super::platform::{Platform, SUPPORTED_PLATFORMS};

/// Local directory tree the assets are provisioned into.
///
/// ```text
/// <base>/opentui.h
/// <base>/lib/<platform>/<library>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    base_dir: PathBuf,
}

impl AssetLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn header_path(&self) -> PathBuf {
        self.base_dir.join(HEADER_FILE_NAME)
    }

    pub fn lib_root(&self) -> PathBuf {
        self.base_dir.join("lib")
    }

    pub fn library_dir(&self, platform: &Platform) -> PathBuf {
        self.lib_root().join(platform.to_string())
    }

    pub fn library_path(&self, platform: &Platform) -> PathBuf {
        self.library_dir(platform).join(local_file_name(platform))
    }

    /// Directories for all known platforms, not only the current one.
    pub fn platform_dirs(&self) -> Vec<PathBuf> {
        SUPPORTED_PLATFORMS
            .iter()
            .map(|platform| self.lib_root().join(platform))
            .collect()
    }
}
