//! Leaf services invoked by the coordinator and the frontends.

pub mod clipboard;
pub mod files;
pub mod rotation;
pub mod settings;
pub mod wallpaper;

pub use files::{delete_image, file_size, move_to_trash};
pub use rotation::{normalize_angle, rotate_image_file, DEFAULT_JPEG_QUALITY};
pub use settings::SettingsManager;
pub use wallpaper::{set_desktop_wallpaper, set_lock_screen_wallpaper};
