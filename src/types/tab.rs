use serde::{Deserialize, Serialize};

use super::errors::TabError;

/// The browser tab the popup was opened over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTab {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Host-side tab/window capability.
///
/// The popup only ever reads the active tab and asks for URLs to be opened;
/// everything else about tabs belongs to the host.
pub trait TabHost {
    /// Returns the active tab of the current window.
    fn active_tab(&self) -> Result<ActiveTab, TabError>;
    /// Opens `url` in a new tab. `active = false` opens it in the background.
    fn open_tab(&mut self, url: &str, active: bool) -> Result<(), TabError>;
}
