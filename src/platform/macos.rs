// PocketCSV platform paths for macOS
// Config: ~/Library/Application Support/PocketCSV/config
// Data:   ~/Library/Application Support/PocketCSV/data

use std::env;
use std::path::PathBuf;

fn app_root() -> PathBuf {
    let home = PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")));
    home.join("Library").join("Application Support").join("PocketCSV")
}

pub fn get_config_dir() -> PathBuf {
    app_root().join("config")
}

pub fn get_data_dir() -> PathBuf {
    app_root().join("data")
}
