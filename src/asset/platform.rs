use std::fmt;
use std::str::FromStr;

/// Architectures a release is published for.
pub const SUPPORTED_ARCHS: [&str; 2] = ["aarch64", "x86_64"];

/// Operating systems a release is published for.
pub const SUPPORTED_OSES: [&str; 3] = ["linux", "macos", "windows"];

/// Every `{arch}-{os}` identifier that gets a directory under `lib/`.
pub const SUPPORTED_PLATFORMS: [&str; 6] = [
    "aarch64-linux",
    "aarch64-macos",
    "aarch64-windows",
    "x86_64-linux",
    "x86_64-macos",
    "x86_64-windows",
];

/// Platform identifier used to pick the native library, displayed as `{arch}-{os}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    pub arch: String,
    pub os: String,
}

impl Platform {
    /// Detect the host platform from the compile target.
    pub fn detect() -> Self {
        Self::from_raw(std::env::consts::ARCH, std::env::consts::OS)
    }

    /// Build a platform from host-reported strings, normalizing the aliases
    /// release assets don't use. Unknown values pass through unchanged.
    pub fn from_raw(arch: &str, os: &str) -> Self {
        Self {
            arch: normalize_arch(arch).to_string(),
            os: normalize_os(os).to_string(),
        }
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_ARCHS.contains(&self.arch.as_str()) && SUPPORTED_OSES.contains(&self.os.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((arch, os)) if !arch.is_empty() && !os.is_empty() => {
                Ok(Platform::from_raw(arch, os))
            }
            _ => anyhow::bail!("Invalid platform '{}'. Expected 'arch-os', e.g. x86_64-linux.", s),
        }
    }
}

/// `arm64 -> aarch64`, `amd64 -> x86_64`; anything else is returned as is.
pub fn normalize_arch(arch: &str) -> &str {
    match arch {
        "arm64" => "aarch64",
        "amd64" => "x86_64",
        other => other,
    }
}

/// `darwin -> macos`; anything else is returned as is.
pub fn normalize_os(os: &str) -> &str {
    match os {
        "darwin" => "macos",
        other => other,
    }
}
