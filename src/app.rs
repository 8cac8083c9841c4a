//! App Core for PocketCSV.
//!
//! Holds the bookmark store, the popup's view state (query and page) and the
//! filtered list derived from them. Every mutation goes store first, then
//! refilter; rendering reads [`App::view`], which only slices the already
//! filtered list.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use log::{info, warn};
use serde::Serialize;

use crate::managers::bookmark_store::BookmarkStore;
use crate::services::csv_codec;
use crate::services::key_value_store::KeyValueStore;
use crate::services::paginator::{self, Pager};
use crate::services::query_engine;
use crate::types::bookmark::Bookmark;
use crate::types::errors::{
    BookmarkError, ExportError, ImportError, StorageError, TabActionError,
};
use crate::types::settings::{
    DisplaySettings, PopupSettings, MAX_RETRY_DELAY_MS, MAX_STARTUP_RETRIES,
};
use crate::types::tab::TabHost;

/// What the popup is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupState {
    /// Lower-cased search text; empty means no filter.
    pub query: String,
    /// 1-indexed page.
    pub page: usize,
}

impl Default for PopupState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
        }
    }
}

impl PopupState {
    /// New query; always returns to the first page.
    pub fn search(&mut self, query: &str) {
        self.query = query.to_lowercase();
        self.page = 1;
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page;
    }
}

/// One row of the bookmark list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkRow {
    pub id: String,
    pub url: String,
    pub title: String,
    pub tags: String,
    pub created_at: i64,
    /// `created_at` as `YYYY-MM-DD` (UTC).
    pub date: String,
    /// Favicon service URL, `None` when the URL has no host.
    pub favicon: Option<String>,
}

impl From<&Bookmark> for BookmarkRow {
    fn from(b: &Bookmark) -> Self {
        Self {
            id: b.id.clone(),
            url: b.url.clone(),
            title: b.title.clone(),
            tags: b.tags.clone(),
            created_at: b.created_at,
            date: format_date(b.created_at),
            favicon: favicon_url(&b.url),
        }
    }
}

/// Everything the popup needs to draw itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupView {
    pub count_text: String,
    pub total: usize,
    pub matching: usize,
    pub page: usize,
    pub total_pages: usize,
    pub items: Vec<BookmarkRow>,
    pub pager: Option<Pager>,
}

/// A CSV export ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
    pub count: usize,
}

/// Collection summary shown on the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    /// Creation date of the oldest bookmark, `None` when there are none.
    pub oldest: Option<String>,
}

impl Stats {
    pub fn oldest_text(&self) -> &str {
        self.oldest.as_deref().unwrap_or("N/A")
    }
}

/// Formats a UNIX timestamp (seconds) as `YYYY-MM-DD` in UTC.
pub fn format_date(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Favicon lookup URL for the bookmark's host.
pub fn favicon_url(url: &str) -> Option<String> {
    crate::types::bookmark::hostname_of(url)
        .ok()
        .map(|host| format!("https://www.google.com/s2/favicons?domain={}&sz=16", host))
}

/// Builds the popup view from an already filtered list.
pub fn render_view(
    total: usize,
    filtered: &[Bookmark],
    state: &PopupState,
    display: &DisplaySettings,
) -> PopupView {
    let count_text = if state.query.is_empty() {
        format!("{} bookmarks", total)
    } else {
        format!("{} of {}", filtered.len(), total)
    };
    let total_pages = paginator::page_count(filtered.len(), display.per_page);
    let items = paginator::page_slice(filtered, state.page, display.per_page)
        .iter()
        .map(BookmarkRow::from)
        .collect();

    PopupView {
        count_text,
        total,
        matching: filtered.len(),
        page: state.page,
        total_pages,
        items,
        pager: paginator::pager(state.page, total_pages, display.max_visible_pages),
    }
}

/// Wait before retry number `retry` (0-based): `initial * 2^retry`, capped
/// at [`MAX_RETRY_DELAY_MS`].
pub fn backoff_delay(initial: Duration, retry: u32) -> Duration {
    let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
    initial
        .saturating_mul(factor)
        .min(Duration::from_millis(MAX_RETRY_DELAY_MS))
}

/// Status line after a successful import.
pub fn import_status(count: usize) -> String {
    format!("Successfully imported {} bookmarks!", count)
}

/// Status line after a successful export.
pub fn export_status(count: usize) -> String {
    format!("Exported {} bookmarks successfully!", count)
}

/// Popup controller: bookmark store plus view state.
pub struct App {
    store: BookmarkStore,
    settings: PopupSettings,
    state: PopupState,
    filtered: Vec<Bookmark>,
}

impl App {
    pub fn new(store: Arc<dyn KeyValueStore>, settings: PopupSettings) -> Self {
        Self {
            store: BookmarkStore::new(store),
            settings,
            state: PopupState::default(),
            filtered: Vec::new(),
        }
    }

    /// Loads the persisted bookmarks, retrying while the store is not ready.
    ///
    /// Waits `startup.retry_delay_ms` before the first retry and doubles the
    /// wait each time, never beyond [`MAX_RETRY_DELAY_MS`]. At most
    /// `startup.max_retries` retries (itself capped at
    /// [`MAX_STARTUP_RETRIES`]) are made before the last error is returned as
    /// `RetriesExhausted`. Non-transient errors are returned at once.
    pub async fn init(&mut self) -> Result<(), StorageError> {
        let policy = &self.settings.startup;
        let max_retries = policy.max_retries.min(MAX_STARTUP_RETRIES);
        let initial = Duration::from_millis(policy.retry_delay_ms);
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            match self.store.load().await {
                Ok(bookmarks) => {
                    info!(
                        "Loaded {} bookmarks (attempt {})",
                        bookmarks.len(),
                        attempts
                    );
                    break;
                }
                Err(e) if e.is_transient() && attempts <= max_retries => {
                    let delay = backoff_delay(initial, attempts - 1);
                    warn!(
                        "Store not ready (attempt {}), retrying in {:?}: {}",
                        attempts, delay, e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_transient() => {
                    return Err(StorageError::RetriesExhausted {
                        attempts,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        self.refilter();
        Ok(())
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn settings(&self) -> &PopupSettings {
        &self.settings
    }

    /// Applies new settings. The page resets since its size may have changed.
    pub fn apply_settings(&mut self, settings: PopupSettings) {
        self.settings = settings;
        self.state.go_to(1);
    }

    /// All bookmarks in storage order.
    pub fn bookmarks(&self) -> &[Bookmark] {
        self.store.bookmarks()
    }

    /// Bookmarks matching the current query, newest first.
    pub fn filtered(&self) -> &[Bookmark] {
        &self.filtered
    }

    fn refilter(&mut self) {
        self.filtered = query_engine::filter(self.store.bookmarks(), &self.state.query);
    }

    pub fn search(&mut self, query: &str) {
        self.state.search(query);
        self.refilter();
    }

    /// Switches page without refiltering.
    pub fn go_to(&mut self, page: usize) {
        self.state.go_to(page);
    }

    pub fn view(&self) -> PopupView {
        render_view(
            self.store.len(),
            &self.filtered,
            &self.state,
            &self.settings.display,
        )
    }

    /// Saves the host's active tab as a new bookmark.
    pub async fn capture(&mut self, host: &dyn TabHost) -> Result<Bookmark, TabActionError> {
        let tab = host.active_tab()?;
        let bookmark = self.store.capture(&tab).await?;
        info!("Captured {}", bookmark.url);
        self.refilter();
        Ok(bookmark)
    }

    /// Applies an inline edit. `Ok(false)` means the bookmark was already gone.
    pub async fn save_edit(
        &mut self,
        id: &str,
        url: &str,
        title: &str,
    ) -> Result<bool, BookmarkError> {
        let changed = self.store.update(id, url, title).await?;
        if changed {
            self.refilter();
        }
        Ok(changed)
    }

    /// Deletes a bookmark. `Ok(false)` means it was already gone.
    pub async fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let removed = self.store.remove(id).await?;
        if removed {
            self.refilter();
        }
        Ok(removed)
    }

    /// Asks the host to open a bookmark. `background` keeps the popup's tab focused.
    pub fn open(
        &self,
        host: &mut dyn TabHost,
        id: &str,
        background: bool,
    ) -> Result<String, TabActionError> {
        let bookmark = self
            .store
            .get(id)
            .ok_or_else(|| BookmarkError::NotFound(id.to_string()))?;
        host.open_tab(&bookmark.url, !background)?;
        Ok(bookmark.url.clone())
    }

    /// Replaces the whole collection with the rows of `csv`.
    ///
    /// `None` means the user did not pick a file. Returns the number of
    /// imported bookmarks.
    pub async fn import_csv(&mut self, csv: Option<&str>) -> Result<usize, ImportError> {
        let csv = csv.ok_or(ImportError::NoFileSelected)?;
        let bookmarks = csv_codec::decode(csv);
        if bookmarks.is_empty() {
            return Err(ImportError::ImportParseEmpty);
        }

        let count = bookmarks.len();
        self.store.replace_all(bookmarks).await?;
        info!("Imported {} bookmarks", count);
        self.state.go_to(1);
        self.refilter();
        Ok(count)
    }

    /// Exports the collection, named after today's local date.
    pub fn export_csv(&self) -> Result<ExportFile, ExportError> {
        self.export_csv_on(Local::now().date_naive())
    }

    /// Exports the collection in storage order, named after `date`.
    pub fn export_csv_on(&self, date: NaiveDate) -> Result<ExportFile, ExportError> {
        let bookmarks = self.store.bookmarks();
        if bookmarks.is_empty() {
            return Err(ExportError::NothingToExport);
        }
        Ok(ExportFile {
            filename: csv_codec::export_filename(&self.settings.export.file_prefix, date),
            contents: csv_codec::encode(bookmarks),
            count: bookmarks.len(),
        })
    }

    pub fn stats(&self) -> Stats {
        let bookmarks = self.store.bookmarks();
        Stats {
            total: bookmarks.len(),
            oldest: bookmarks.iter().map(|b| b.created_at).min().map(format_date),
        }
    }
}
