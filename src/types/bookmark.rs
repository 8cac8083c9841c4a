use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use super::errors::BookmarkError;

/// Represents a saved bookmark.
///
/// `id` is the stable handle used by edit and delete; two bookmarks with the
/// same URL are still distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default = "new_bookmark_id")]
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub tags: String,
    pub created_at: i64,
}

impl Bookmark {
    /// Creates a bookmark with a fresh id.
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        tags: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: new_bookmark_id(),
            url: url.into(),
            title: title.into(),
            tags: tags.into(),
            created_at,
        }
    }

    /// Hostname of this bookmark's URL, if it parses and has one.
    pub fn hostname(&self) -> Option<String> {
        hostname_of(&self.url).ok()
    }
}

/// Generates a new bookmark identifier.
pub fn new_bookmark_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns the current UNIX timestamp in seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Extracts the hostname of an absolute URL.
///
/// Fails with `InvalidUrl` when the string does not parse or has no host
/// (e.g. `about:blank`, `data:` URLs).
pub fn hostname_of(raw: &str) -> Result<String, BookmarkError> {
    let parsed =
        url::Url::parse(raw).map_err(|e| BookmarkError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(BookmarkError::InvalidUrl(format!("{}: no host", raw))),
    }
}

/// Checks that `raw` is an absolute URL.
pub fn check_url(raw: &str) -> Result<(), BookmarkError> {
    url::Url::parse(raw)
        .map(|_| ())
        .map_err(|e| BookmarkError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Uses `title` when it is not blank, otherwise the hostname of `url`.
pub fn title_or_hostname(title: Option<&str>, url: &str) -> Result<String, BookmarkError> {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => hostname_of(url),
    }
}
