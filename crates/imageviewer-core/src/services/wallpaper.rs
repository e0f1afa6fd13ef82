//! Desktop and lock screen wallpaper.
//!
//! Only implemented on Windows; other platforms report
//! [`AppError::UnsupportedOnPlatform`].

use std::path::Path;

use crate::utils::error::{AppError, AppResult};

/// Set the desktop wallpaper to the image at `path`.
pub fn set_desktop_wallpaper(path: &Path) -> AppResult<()> {
    platform::set_desktop_wallpaper(path)
}

/// Set the lock screen image (per-user PersonalizationCSP policy).
pub fn set_lock_screen_wallpaper(path: &Path) -> AppResult<()> {
    platform::set_lock_screen_wallpaper(path)
}

#[cfg_attr(not(windows), allow(dead_code))]
fn ensure_file(path: &Path) -> AppResult<()> {
    if !path.exists() {
        return Err(AppError::NotFound(path.display().to_string()));
    }
    Ok(())
}

#[cfg(windows)]
mod platform {
    use std::ffi::c_void;
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;

    use windows::core::{HSTRING, PCWSTR};
    use windows::Win32::System::Registry::{
        RegCloseKey, RegCreateKeyExW, RegSetValueExW, HKEY, HKEY_CURRENT_USER, KEY_WRITE,
        REG_DWORD, REG_OPTION_NON_VOLATILE, REG_SZ,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        SystemParametersInfoW, SPIF_SENDCHANGE, SPIF_UPDATEINIFILE, SPI_SETDESKWALLPAPER,
    };

    use crate::utils::error::{AppError, AppResult};

    const LOCK_SCREEN_KEY: &str =
        r"Software\Microsoft\Windows\CurrentVersion\PersonalizationCSP";

    fn win_err(e: windows::core::Error) -> AppError {
        AppError::Io(std::io::Error::other(e.to_string()))
    }

    fn wide(path: &Path) -> Vec<u16> {
        path.as_os_str().encode_wide().chain(std::iter::once(0)).collect()
    }

    pub fn set_desktop_wallpaper(path: &Path) -> AppResult<()> {
        super::ensure_file(path)?;
        let mut buf = wide(path);
        unsafe {
            SystemParametersInfoW(
                SPI_SETDESKWALLPAPER,
                0,
                Some(buf.as_mut_ptr() as *mut c_void),
                SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
            )
        }
        .map_err(win_err)?;

        tracing::info!("Desktop wallpaper set: {}", path.display());
        Ok(())
    }

    pub fn set_lock_screen_wallpaper(path: &Path) -> AppResult<()> {
        super::ensure_file(path)?;
        let value: Vec<u8> = wide(path).iter().flat_map(|c| c.to_le_bytes()).collect();
        let mut hkey = HKEY::default();

        unsafe {
            RegCreateKeyExW(
                HKEY_CURRENT_USER,
                &HSTRING::from(LOCK_SCREEN_KEY),
                None,
                PCWSTR::null(),
                REG_OPTION_NON_VOLATILE,
                KEY_WRITE,
                None,
                &mut hkey,
                None,
            )
            .ok()
            .map_err(win_err)?;

            let result = (|| {
                for name in ["LockScreenImagePath", "LockScreenImageUrl"] {
                    RegSetValueExW(hkey, &HSTRING::from(name), None, REG_SZ, Some(&value))
                        .ok()
                        .map_err(win_err)?;
                }
                RegSetValueExW(
                    hkey,
                    &HSTRING::from("LockScreenImageStatus"),
                    None,
                    REG_DWORD,
                    Some(&1u32.to_le_bytes()),
                )
                .ok()
                .map_err(win_err)
            })();

            let _ = RegCloseKey(hkey);
            result?;
        }

        tracing::info!("Lock screen wallpaper set: {}", path.display());
        Ok(())
    }
}

#[cfg(not(windows))]
mod platform {
    use std::path::Path;

    use crate::utils::error::{AppError, AppResult};

    pub fn set_desktop_wallpaper(_path: &Path) -> AppResult<()> {
        Err(AppError::UnsupportedOnPlatform("desktop wallpaper".to_string()))
    }

    pub fn set_lock_screen_wallpaper(_path: &Path) -> AppResult<()> {
        Err(AppError::UnsupportedOnPlatform("lock screen wallpaper".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn test_unsupported_off_windows() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("wall.png");
        std::fs::write(&path, b"x").unwrap();

        assert!(matches!(
            set_desktop_wallpaper(&path),
            Err(AppError::UnsupportedOnPlatform(_))
        ));
        assert!(matches!(
            set_lock_screen_wallpaper(&path),
            Err(AppError::UnsupportedOnPlatform(_))
        ));
    }

    #[cfg(windows)]
    #[test]
    fn test_missing_file_is_not_found() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            set_desktop_wallpaper(&tmp.path().join("missing.png")),
            Err(AppError::NotFound(_))
        ));
    }
}
