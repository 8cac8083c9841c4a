// PocketCSV platform abstraction
// Resolves where settings and the bookmark database live on each OS.
//
// Uses `cfg(target_os)` to pick the platform-specific implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable that overrides the data directory (database and logs).
/// The config directory is not affected.
pub const DATA_DIR_ENV: &str = "POCKETCSV_DATA_DIR";

/// Returns the platform-specific configuration directory for PocketCSV.
///
/// - **Linux**: `~/.config/pocketcsv` (or `$XDG_CONFIG_HOME/pocketcsv`)
/// - **macOS**: `~/Library/Application Support/PocketCSV/config`
/// - **Windows**: `%APPDATA%/PocketCSV/config`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the directory holding `pocketcsv.db` and the RPC log.
///
/// `$POCKETCSV_DATA_DIR` wins when set; otherwise:
/// - **Linux**: `~/.local/share/pocketcsv` (or `$XDG_DATA_HOME/pocketcsv`)
/// - **macOS**: `~/Library/Application Support/PocketCSV/data`
/// - **Windows**: `%APPDATA%/PocketCSV/data`
pub fn get_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok())
}

/// A non-blank `override_dir` wins over the platform default.
fn data_dir_from(override_dir: Option<String>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
