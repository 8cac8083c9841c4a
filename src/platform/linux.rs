// PocketCSV platform paths for Linux
// Config: ~/.config/pocketcsv
// Data:   ~/.local/share/pocketcsv

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$XDG_CONFIG_HOME/pocketcsv` if set, otherwise `~/.config/pocketcsv`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("pocketcsv"),
        _ => home_dir().join(".config").join("pocketcsv"),
    }
}

/// Uses `$XDG_DATA_HOME/pocketcsv` if set, otherwise `~/.local/share/pocketcsv`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("pocketcsv"),
        _ => home_dir().join(".local").join("share").join("pocketcsv"),
    }
}
