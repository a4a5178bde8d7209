//! Release asset and local file names.
//!
//! Remote names carry the platform as a suffix so every build can live in the
//! same release. Local names are canonical, since each platform has its own
//! directory.

use super::platform::Platform;

/// Name of the C header, both in the release and on disk.
pub const HEADER_FILE_NAME: &str = "opentui.h";

/// Release asset name of the native library for `platform`.
///
/// Empty when the operating system is not one a release is published for.
pub fn asset_file_name(platform: &Platform) -> String {
    let arch = &platform.arch;
    match platform.os.as_str() {
        "windows" => format!("opentui-{}-windows.dll", arch),
        "macos" => format!("libopentui-{}-macos.dylib", arch),
        "linux" => format!("libopentui-{}-linux.so", arch),
        _ => String::new(),
    }
}

/// File name the native library is stored under in `lib/<platform>/`.
///
/// Empty when the operating system is not one a release is published for.
pub fn local_file_name(platform: &Platform) -> String {
    match platform.os.as_str() {
        "windows" => "opentui.dll",
        "macos" => "libopentui.dylib",
        "linux" => "libopentui.so",
        _ => "",
    }
    .to_string()
}
