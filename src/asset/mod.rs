//! Asset naming module
//!
//! This module maps the host platform to the release asset that carries its
//! native library, and to the local path that asset is stored under.

mod layout;
mod naming;
mod platform;

pub use layout::AssetLayout;
pub use naming::{HEADER_FILE_NAME, asset_file_name, local_file_name};
pub use platform::{
    Platform, SUPPORTED_ARCHS, SUPPORTED_OSES, SUPPORTED_PLATFORMS, normalize_arch, normalize_os,
};
