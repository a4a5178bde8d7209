pub mod asset;
pub mod config;
pub mod download;
pub mod error;
pub mod http;
pub mod provision;
pub mod runtime;

pub use config::Config;
pub use error::ProvisionError;
pub use provision::{AssetSource, Assets, ProvisionState, Provisioner};
