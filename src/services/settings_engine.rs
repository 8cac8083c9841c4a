// PocketCSV Settings Engine
// Loads, saves, updates and resets popup settings.
// Settings are stored as a JSON file at the platform-specific config path.

use std::fs;
use std::path::Path;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::{
    PopupSettings, MAX_PER_PAGE, MAX_RETRY_DELAY_MS, MAX_STARTUP_RETRIES, MAX_VISIBLE_PAGES,
};

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<PopupSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &PopupSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: PopupSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: PopupSettings::default(),
        }
    }

    /// Rejects settings the popup cannot work with.
    pub fn validate(settings: &PopupSettings) -> Result<(), SettingsError> {
        let display = &settings.display;
        if display.per_page == 0 || display.per_page > MAX_PER_PAGE {
            return Err(SettingsError::InvalidValue(format!(
                "display.per_page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        if display.max_visible_pages == 0 || display.max_visible_pages > MAX_VISIBLE_PAGES {
            return Err(SettingsError::InvalidValue(format!(
                "display.max_visible_pages must be between 1 and {}",
                MAX_VISIBLE_PAGES
            )));
        }
        if settings.startup.max_retries > MAX_STARTUP_RETRIES {
            return Err(SettingsError::InvalidValue(format!(
                "startup.max_retries must be at most {}",
                MAX_STARTUP_RETRIES
            )));
        }
        if settings.startup.retry_delay_ms > MAX_RETRY_DELAY_MS {
            return Err(SettingsError::InvalidValue(format!(
                "startup.retry_delay_ms must be at most {}",
                MAX_RETRY_DELAY_MS
            )));
        }
        if settings.export.file_prefix.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "export.file_prefix cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// A missing file yields defaults; a malformed or invalid one is an error.
    fn load(&mut self) -> Result<PopupSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = PopupSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: PopupSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Self::validate(&settings)?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings, creating parent directories as needed.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &PopupSettings {
        &self.settings
    }

    /// Updates an individual setting by dot-notation key path and saves.
    ///
    /// # Examples
    /// - `"display.per_page"`
    /// - `"startup.retry_delay_ms"`
    /// - `"export.file_prefix"`
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let (section, field) = match key.rsplit_once('.') {
            Some((section, field)) => (format!("/{}", section.replace('.', "/")), field),
            None => (String::new(), key),
        };
        let slot = json_value
            .pointer_mut(&section)
            .and_then(|parent| parent.as_object_mut())
            .and_then(|map| map.get_mut(field))
            .ok_or_else(|| {
                SettingsError::InvalidKey(format!("Key '{}' not found in settings", key))
            })?;
        *slot = value;

        let new_settings: PopupSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        Self::validate(&new_settings)?;

        self.settings = new_settings;
        self.save()?;

        Ok(())
    }

    /// Resets all settings to defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = PopupSettings::default();
        self.save()?;
        Ok(())
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
