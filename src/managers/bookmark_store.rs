//! Bookmark Store for PocketCSV.
//!
//! Owns the canonical bookmark list and keeps it in sync with the key-value
//! store. The whole list lives under one key and every mutation rewrites it
//! in full. Newly added bookmarks go to the front of the stored list.
//!
//! If writing a mutation fails, the in-memory list is rolled back so it never
//! drifts from what is stored.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::services::key_value_store::KeyValueStore;
use crate::types::bookmark::{check_url, title_or_hostname, unix_now, Bookmark};
use crate::types::errors::{BookmarkError, StorageError};
use crate::types::tab::ActiveTab;

/// Storage key holding the serialized bookmark list.
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// In-memory bookmark list backed by a key-value store.
pub struct BookmarkStore {
    store: Arc<dyn KeyValueStore>,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    /// Creates an empty store. Call [`load`](Self::load) to read persisted bookmarks.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            bookmarks: Vec::new(),
        }
    }

    /// Reads the persisted list, replacing the in-memory one.
    ///
    /// A missing key is an empty list.
    pub async fn load(&mut self) -> Result<&[Bookmark], StorageError> {
        let bookmarks = match self.store.get(BOOKMARKS_KEY).await? {
            Some(value) => serde_json::from_value::<Vec<Bookmark>>(value).map_err(|e| {
                StorageError::SerializationError(format!("Failed to parse bookmarks: {}", e))
            })?,
            None => Vec::new(),
        };
        debug!("Loaded {} bookmarks", bookmarks.len());
        self.bookmarks = bookmarks;
        Ok(&self.bookmarks)
    }

    /// Bookmarks in storage order (newest additions first).
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn get(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    /// Inserts `bookmark` at the front and persists.
    pub async fn add(&mut self, bookmark: Bookmark) -> Result<(), StorageError> {
        let previous = self.bookmarks.clone();
        debug!("Adding bookmark {} ({})", bookmark.id, bookmark.url);
        self.bookmarks.insert(0, bookmark);
        self.persist_or_restore(previous).await
    }

    /// Builds a bookmark from the active tab and adds it.
    ///
    /// The tab title is used when present, otherwise the URL's hostname.
    pub async fn capture(&mut self, tab: &ActiveTab) -> Result<Bookmark, BookmarkError> {
        let url = tab.url.trim();
        if url.is_empty() {
            return Err(BookmarkError::EmptyUrl);
        }
        check_url(url)?;
        let title = title_or_hostname(tab.title.as_deref(), url)?;

        let bookmark = Bookmark::new(url, title, "", unix_now());
        self.add(bookmark.clone()).await?;
        Ok(bookmark)
    }

    /// Changes the URL and title of the bookmark with `id`.
    ///
    /// A blank `new_title` becomes the hostname of `new_url`. Returns
    /// `Ok(false)` when no bookmark has that id; nothing is written then.
    pub async fn update(
        &mut self,
        id: &str,
        new_url: &str,
        new_title: &str,
    ) -> Result<bool, BookmarkError> {
        let new_url = new_url.trim();
        if new_url.is_empty() {
            return Err(BookmarkError::EmptyUrl);
        }

        let Some(index) = self.bookmarks.iter().position(|b| b.id == id) else {
            debug!("Update skipped, bookmark {} no longer exists", id);
            return Ok(false);
        };

        check_url(new_url)?;
        let title = title_or_hostname(Some(new_title), new_url)?;

        let previous = self.bookmarks.clone();
        let entry = &mut self.bookmarks[index];
        entry.url = new_url.to_string();
        entry.title = title;
        self.persist_or_restore(previous).await?;
        Ok(true)
    }

    /// Removes the bookmark with `id`. Returns `Ok(false)` when it was already gone.
    pub async fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(index) = self.bookmarks.iter().position(|b| b.id == id) else {
            debug!("Remove skipped, bookmark {} no longer exists", id);
            return Ok(false);
        };

        let previous = self.bookmarks.clone();
        self.bookmarks.remove(index);
        self.persist_or_restore(previous).await?;
        Ok(true)
    }

    /// Discards the current list and persists `bookmarks` in its place.
    pub async fn replace_all(&mut self, bookmarks: Vec<Bookmark>) -> Result<(), StorageError> {
        let previous = std::mem::replace(&mut self.bookmarks, bookmarks);
        info!(
            "Replacing {} bookmarks with {}",
            previous.len(),
            self.bookmarks.len()
        );
        self.persist_or_restore(previous).await
    }

    /// Writes the whole in-memory list to the key-value store.
    pub async fn persist(&self) -> Result<(), StorageError> {
        let value = serde_json::to_value(&self.bookmarks)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.store.set(BOOKMARKS_KEY, value).await
    }

    async fn persist_or_restore(&mut self, previous: Vec<Bookmark>) -> Result<(), StorageError> {
        if let Err(e) = self.persist().await {
            warn!("Persist failed, restoring {} bookmarks: {}", previous.len(), e);
            self.bookmarks = previous;
            return Err(e);
        }
        Ok(())
    }
}
