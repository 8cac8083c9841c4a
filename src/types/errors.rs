use std::fmt;

// === StorageError ===

/// Errors raised by the key-value store collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// The store is not ready or the backing medium failed; retrying may help.
    Unavailable(String),
    /// The stored value could not be serialized or deserialized.
    SerializationError(String),
    /// Startup gave up waiting for the store.
    RetriesExhausted { attempts: u32, last_error: String },
}

impl StorageError {
    /// Whether the operation may succeed if attempted again later.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Unavailable(_))
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
            StorageError::RetriesExhausted {
                attempts,
                last_error,
            } => write!(
                f,
                "Storage still unavailable after {} attempts: {}",
                attempts, last_error
            ),
        }
    }
}

impl std::error::Error for StorageError {}

// === BookmarkError ===

/// Errors related to bookmark capture and editing.
#[derive(Debug, Clone, PartialEq)]
pub enum BookmarkError {
    /// The URL does not parse or has no hostname to derive a title from.
    InvalidUrl(String),
    /// An edit supplied an empty URL.
    EmptyUrl,
    /// Bookmark with the given ID was not found.
    NotFound(String),
    /// Persisting the change failed.
    Storage(StorageError),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            BookmarkError::EmptyUrl => write!(f, "URL cannot be empty"),
            BookmarkError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            BookmarkError::Storage(e) => write!(f, "Bookmark storage error: {}", e),
        }
    }
}

impl std::error::Error for BookmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BookmarkError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for BookmarkError {
    fn from(e: StorageError) -> Self {
        BookmarkError::Storage(e)
    }
}

// === ImportError ===

/// Errors related to CSV import.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportError {
    /// The user triggered import without choosing a file.
    NoFileSelected,
    /// Decoding produced zero records.
    ImportParseEmpty,
    /// The host could not read the chosen file.
    FileReadFailed(String),
    /// Persisting the imported collection failed.
    Storage(StorageError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NoFileSelected => write!(f, "Please select a CSV file first"),
            ImportError::ImportParseEmpty => write!(f, "No valid bookmarks found in CSV file"),
            ImportError::FileReadFailed(msg) => write!(f, "Failed to read file: {}", msg),
            ImportError::Storage(e) => write!(f, "Import failed: {}", e),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for ImportError {
    fn from(e: StorageError) -> Self {
        ImportError::Storage(e)
    }
}

// === ExportError ===

/// Errors related to CSV export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// The collection is empty.
    NothingToExport,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NothingToExport => write!(f, "No bookmarks to export"),
        }
    }
}

impl std::error::Error for ExportError {}

// === TabError ===

/// Errors reported by the tab host.
#[derive(Debug, Clone, PartialEq)]
pub enum TabError {
    /// The host has no active tab to capture.
    NoActiveTab,
    /// The host rejected or could not perform the request.
    HostUnavailable(String),
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabError::NoActiveTab => write!(f, "No active tab"),
            TabError::HostUnavailable(msg) => write!(f, "Tab host unavailable: {}", msg),
        }
    }
}

impl std::error::Error for TabError {}

// === TabActionError ===

/// Errors from popup actions that involve the tab host (capture, open).
#[derive(Debug, Clone, PartialEq)]
pub enum TabActionError {
    Tab(TabError),
    Bookmark(BookmarkError),
}

impl fmt::Display for TabActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabActionError::Tab(e) => write!(f, "{}", e),
            TabActionError::Bookmark(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TabActionError {}

impl From<TabError> for TabActionError {
    fn from(e: TabError) -> Self {
        TabActionError::Tab(e)
    }
}

impl From<BookmarkError> for TabActionError {
    fn from(e: BookmarkError) -> Self {
        TabActionError::Bookmark(e)
    }
}

impl From<StorageError> for TabActionError {
    fn from(e: StorageError) -> Self {
        TabActionError::Bookmark(BookmarkError::Storage(e))
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
