use serde::{Deserialize, Serialize};

/// Largest accepted `display.per_page`.
pub const MAX_PER_PAGE: usize = 500;
/// Largest accepted `display.max_visible_pages`.
pub const MAX_VISIBLE_PAGES: usize = 25;
/// Largest accepted `startup.max_retries`.
pub const MAX_STARTUP_RETRIES: u32 = 10;
/// Upper bound on any single startup retry delay, in milliseconds.
pub const MAX_RETRY_DELAY_MS: u64 = 5_000;

/// Top-level popup settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PopupSettings {
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub startup: StartupSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

/// List and pager layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    pub per_page: usize,
    pub max_visible_pages: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            per_page: 10,
            max_visible_pages: 5,
        }
    }
}

/// Retry policy for the initial load while the store is not ready.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartupSettings {
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub retry_delay_ms: u64,
}

impl Default for StartupSettings {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_delay_ms: 100,
        }
    }
}

/// CSV export naming.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportSettings {
    pub file_prefix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_prefix: "pocket-export".to_string(),
        }
    }
}
