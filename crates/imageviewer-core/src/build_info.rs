//! Application identity: name, version and the build it came from.

pub const APP_NAME: &str = "ImageViewer";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Short commit hash, or `unknown` outside a git checkout.
pub const COMMIT_HASH: &str = env!("IMAGEVIEWER_COMMIT_HASH");
/// UTC build time, RFC 3339.
pub const BUILD_TIMESTAMP: &str = env!("IMAGEVIEWER_BUILD_TIMESTAMP");

/// `<version> (<commit> <timestamp>)`, as printed by `--version` long forms.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("IMAGEVIEWER_COMMIT_HASH"),
    " ",
    env!("IMAGEVIEWER_BUILD_TIMESTAMP"),
    ")"
);
