//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use imageviewer_core::build_info;
use imageviewer_core::WallpaperTarget;

#[derive(Parser, Debug)]
#[command(
    name = "imageviewer",
    version = build_info::APP_VERSION,
    long_version = build_info::LONG_VERSION,
    about = "ImageViewer - rotate, trash and set images as wallpaper"
)]
pub struct Cli {
    /// Directory for settings and logs (defaults to the per-user data directory)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Stop waiting for operations after this many milliseconds (0 waits forever)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rotate an image; several angles are submitted back to back
    Rotate(RotateArgs),
    /// Set an image as wallpaper
    Wallpaper(WallpaperArgs),
    /// Move an image to the trash
    Trash(FileArgs),
    /// Print the size of a file in bytes
    Size(FileArgs),
    /// Copy the image pixels to the clipboard
    CopyImage(FileArgs),
    /// Copy the image path to the clipboard
    CopyPath(FileArgs),
}

#[derive(Args, Debug)]
pub struct FileArgs {
    /// Image path or file:// URL
    pub file: String,
}

#[derive(Args, Debug)]
pub struct RotateArgs {
    /// Image path or file:// URL
    pub file: String,

    /// Clockwise angles in degrees; negative turns counter-clockwise
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub angles: Vec<i32>,
}

#[derive(Args, Debug)]
pub struct WallpaperArgs {
    /// Image path or file:// URL
    pub file: String,

    #[arg(long, value_enum, default_value_t = TargetArg::Desktop)]
    pub target: TargetArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetArg {
    Desktop,
    LockScreen,
    Both,
}

impl From<TargetArg> for WallpaperTarget {
    fn from(value: TargetArg) -> Self {
        match value {
            TargetArg::Desktop => WallpaperTarget::Desktop,
            TargetArg::LockScreen => WallpaperTarget::LockScreen,
            TargetArg::Both => WallpaperTarget::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_long_version_names_the_build() {
        let long = Cli::command().render_long_version();
        assert!(long.contains(build_info::APP_VERSION));
        assert!(long.contains(build_info::COMMIT_HASH));
        assert!(long.contains(build_info::BUILD_TIMESTAMP));

        let short = Cli::command().render_version();
        assert!(!short.contains(build_info::BUILD_TIMESTAMP));

        let err = Cli::try_parse_from(["imageviewer", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_rotate_accepts_negative_angles() {
        let cli = Cli::try_parse_from(["imageviewer", "rotate", "a.jpg", "90", "-90", "180"]).unwrap();
        match cli.command {
            Commands::Rotate(args) => {
                assert_eq!(args.file, "a.jpg");
                assert_eq!(args.angles, vec![90, -90, 180]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rotate_requires_an_angle() {
        assert!(Cli::try_parse_from(["imageviewer", "rotate", "a.jpg"]).is_err());
    }

    #[test]
    fn test_wallpaper_target() {
        let cli = Cli::try_parse_from([
            "imageviewer",
            "wallpaper",
            "a.jpg",
            "--target",
            "lock-screen",
            "--timeout-ms",
            "500",
        ])
        .unwrap();
        assert_eq!(cli.timeout_ms, Some(500));
        match cli.command {
            Commands::Wallpaper(args) => {
                assert_eq!(WallpaperTarget::from(args.target), WallpaperTarget::LockScreen)
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["imageviewer", "wallpaper", "a.jpg"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Wallpaper(WallpaperArgs { target: TargetArg::Desktop, .. })
        ));
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        assert!(Cli::try_parse_from(["imageviewer", "wallpaper", "a.jpg", "--target", "ceiling"]).is_err());
    }
}
