use anyhow::Result;
use clap::Parser;
use opentui_fetch::asset::Platform;
use opentui_fetch::runtime::{RealRuntime, Runtime};
use opentui_fetch::{AssetSource, Assets, Config, Provisioner};
use std::path::PathBuf;

/// opentui-fetch - OpenTUI native library installer
///
/// Download the OpenTUI C header and the native library for this platform
/// from the latest release, laid out as:
///
///   opentui.h
///   lib/<arch>-<os>/<library>
///
/// Files that already exist are left alone.
#[derive(Parser, Debug)]
#[command(author, version = env!("OPENTUI_FETCH_VERSION"), about)]
struct Cli {
    /// Directory to place the assets in (defaults to the current directory)
    #[arg(long = "dir", short = 'd', env = "OPENTUI_ASSETS_DIR", value_name = "PATH")]
    dir: Option<PathBuf>,

    /// Release download base URL
    #[arg(long = "release-url", env = "OPENTUI_RELEASE_URL", value_name = "URL")]
    release_url: Option<String>,

    /// Fetch the library for another platform, e.g. aarch64-macos
    #[arg(long = "platform", env = "OPENTUI_PLATFORM", value_name = "ARCH-OS")]
    platform: Option<Platform>,

    /// Skip the C header
    #[arg(long = "no-header")]
    no_header: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(assets) => match assets.source {
            AssetSource::Downloaded => println!("Assets downloaded successfully"),
            AssetSource::Cached => println!("Assets already present"),
        },
        Err(e) => {
            eprintln!("Error downloading assets: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<Assets> {
    let base_dir = match cli.dir {
        Some(dir) => dir,
        None => RealRuntime.current_dir()?,
    };

    let config = Config::new(base_dir)
        .with_release_url(cli.release_url)
        .with_platform(cli.platform)
        .with_header(!cli.no_header);

    let provisioner = Provisioner::from_config(config)?;
    Ok(provisioner.ensure().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_no_flags() {
        let cli = Cli::try_parse_from(["opentui-fetch"]).unwrap();
        assert_eq!(cli.dir, None);
        assert_eq!(cli.platform, None);
        assert!(!cli.no_header);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "opentui-fetch",
            "--dir",
            "/tmp/opentui",
            "--release-url",
            "http://localhost:8080",
            "--platform",
            "arm64-darwin",
            "--no-header",
        ])
        .unwrap();

        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/opentui")));
        assert_eq!(cli.release_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(cli.platform, Some(Platform::from_raw("aarch64", "macos")));
        assert!(cli.no_header);
    }

    #[test]
    fn test_cli_rejects_malformed_platform() {
        let result = Cli::try_parse_from(["opentui-fetch", "--platform", "linux"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_positional_arguments() {
        let result = Cli::try_parse_from(["opentui-fetch", "extra"]);
        assert!(result.is_err());
    }
}
