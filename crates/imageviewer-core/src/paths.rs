//! Path handling: application data locations and frontend-supplied file URLs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use url::Url;

/// Trait for providing application data paths.
pub trait PathProvider: Send + Sync {
    /// Get the root application data directory.
    fn app_data_dir(&self) -> PathBuf;

    /// Get the settings file path.
    fn settings_path(&self) -> PathBuf {
        self.app_data_dir().join("Config").join("settings.json")
    }

    /// Get the logs directory.
    fn logs_dir(&self) -> PathBuf {
        self.app_data_dir().join("Logs")
    }
}

/// Shared reference to a PathProvider implementation.
pub type SharedPathProvider = Arc<dyn PathProvider>;

/// Default provider rooted at `<data dir>/ImageViewer/`.
#[derive(Debug, Clone)]
pub struct AppPathProvider {
    app_data_dir: PathBuf,
}

impl AppPathProvider {
    pub fn new() -> Self {
        let app_data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ImageViewer");
        Self { app_data_dir }
    }

    /// Create a provider with a custom base directory.
    ///
    /// Useful for testing.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            app_data_dir: base_dir,
        }
    }
}

impl Default for AppPathProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PathProvider for AppPathProvider {
    fn app_data_dir(&self) -> PathBuf {
        self.app_data_dir.clone()
    }
}

/// Turn a `file://` URL or a plain path string into a filesystem path.
///
/// Percent-escapes in URLs are decoded; plain paths are taken verbatim. A URL
/// that names no local file (a foreign host on Unix, a non-file scheme) is
/// kept as a literal path, which later fails as not found.
pub fn resolve_local_path(uri: &str) -> PathBuf {
    if !starts_with_file_scheme(uri) {
        return PathBuf::from(uri);
    }

    match Url::parse(uri) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().unwrap_or_else(|()| {
            tracing::debug!(uri, "file URL does not name a local path");
            PathBuf::from(uri)
        }),
        _ => PathBuf::from(uri),
    }
}

fn starts_with_file_scheme(uri: &str) -> bool {
    uri.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("file:"))
}

/// Format a path as a `file://` URL. Relative paths are taken against the
/// current directory.
pub fn to_file_url(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    match Url::from_file_path(&absolute) {
        Ok(url) => url.into(),
        Err(()) => format!("file://{}", absolute.to_string_lossy().replace('\\', "/")),
    }
}

/// The image the application was launched with.
///
/// Skips the program name and returns the first argument naming an existing
/// regular file, as an absolute `file://` URL.
pub fn initial_image_from_args<I, S>(args: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter().skip(1).find_map(|arg| {
        let path = resolve_local_path(arg.as_ref());
        if !path.is_file() {
            return None;
        }
        let absolute = std::fs::canonicalize(&path).unwrap_or(path);
        Some(to_file_url(&strip_verbatim(absolute)))
    })
}

/// `canonicalize` yields `\\?\C:\...` on Windows; frontends want `C:\...`.
fn strip_verbatim(path: PathBuf) -> PathBuf {
    match path.to_str().and_then(|s| s.strip_prefix(r"\\?\")) {
        Some(stripped) => PathBuf::from(stripped),
        None => path,
    }
}
