//! Unit tests for the App controller: startup retries, search and paging,
//! inline edits, import/export and statistics.

use std::sync::Arc;

use chrono::NaiveDate;

use pocketcsv::app::{export_status, import_status, App};
use pocketcsv::services::key_value_store::{KeyValueStore, MemoryKeyValueStore};
use pocketcsv::types::bookmark::Bookmark;
use pocketcsv::types::errors::{
    BookmarkError, ExportError, ImportError, StorageError, TabActionError, TabError,
};
use pocketcsv::types::settings::{PopupSettings, MAX_STARTUP_RETRIES};
use pocketcsv::types::tab::{ActiveTab, TabHost};

/// Tab host that reports a fixed tab and remembers what it was asked to open.
#[derive(Default)]
struct FakeHost {
    tab: Option<ActiveTab>,
    opened: Vec<(String, bool)>,
}

impl TabHost for FakeHost {
    fn active_tab(&self) -> Result<ActiveTab, TabError> {
        self.tab.clone().ok_or(TabError::NoActiveTab)
    }

    fn open_tab(&mut self, url: &str, active: bool) -> Result<(), TabError> {
        self.opened.push((url.to_string(), active));
        Ok(())
    }
}

fn fast_settings() -> PopupSettings {
    let mut settings = PopupSettings::default();
    settings.startup.retry_delay_ms = 1;
    settings
}

async fn app_with(bookmarks: Vec<Bookmark>) -> App {
    let kv = Arc::new(MemoryKeyValueStore::new());
    kv.set("bookmarks", serde_json::to_value(&bookmarks).unwrap())
        .await
        .unwrap();
    let mut app = App::new(kv, fast_settings());
    app.init().await.unwrap();
    app
}

fn numbered(n: usize) -> Vec<Bookmark> {
    (0..n)
        .map(|i| {
            Bookmark::new(
                format!("https://site{}.com", i),
                format!("Site {}", i),
                "",
                i as i64,
            )
        })
        .collect()
}

// ─── Startup ───

#[tokio::test]
async fn test_init_retries_until_store_ready() {
    let kv = Arc::new(MemoryKeyValueStore::not_ready_for(3));
    let mut app = App::new(kv, fast_settings());
    app.init().await.unwrap();
    assert_eq!(app.view().count_text, "0 bookmarks");
}

#[tokio::test]
async fn test_init_gives_up_after_max_retries() {
    let kv = Arc::new(MemoryKeyValueStore::not_ready_for(100));
    let mut settings = fast_settings();
    settings.startup.max_retries = 2;
    let mut app = App::new(kv, settings);

    match app.init().await {
        Err(StorageError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_init_retry_count_is_capped() {
    let kv = Arc::new(MemoryKeyValueStore::not_ready_for(1_000));
    let mut settings = fast_settings();
    settings.startup.max_retries = 40;
    settings.startup.retry_delay_ms = 0;
    let mut app = App::new(kv, settings);

    match app.init().await {
        Err(StorageError::RetriesExhausted { attempts, .. }) => {
            assert_eq!(attempts, MAX_STARTUP_RETRIES + 1)
        }
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_init_does_not_retry_corrupt_data() {
    let kv = Arc::new(MemoryKeyValueStore::new());
    kv.set("bookmarks", serde_json::json!("garbage")).await.unwrap();
    let mut app = App::new(kv, fast_settings());
    assert!(matches!(
        app.init().await,
        Err(StorageError::SerializationError(_))
    ));
}

// ─── Search and paging ───

#[tokio::test]
async fn test_view_is_newest_first_and_paged() {
    let app = app_with(numbered(25)).await;
    let view = app.view();

    assert_eq!(view.count_text, "25 bookmarks");
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.items.len(), 10);
    assert_eq!(view.items[0].created_at, 24);
    assert_eq!(view.items[9].created_at, 15);

    let pager = view.pager.unwrap();
    assert!(!pager.prev_enabled);
    assert!(pager.next_enabled);
    let numbers: Vec<usize> = pager.buttons.iter().map(|b| b.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_search_resets_page_and_counts_matches() {
    let mut app = app_with(numbered(25)).await;
    app.go_to(3);
    assert_eq!(app.view().items.len(), 5);

    app.search("SITE 1");
    let view = app.view();
    assert_eq!(view.page, 1);
    // "site 1" and "site 10".."site 19"
    assert_eq!(view.count_text, "11 of 25");
    assert_eq!(view.matching, 11);
}

#[tokio::test]
async fn test_go_to_past_end_is_empty_page() {
    let mut app = app_with(numbered(25)).await;
    app.go_to(4);
    let view = app.view();
    assert!(view.items.is_empty());
    assert_eq!(view.page, 4);
}

#[tokio::test]
async fn test_go_to_huge_page_is_empty_page() {
    let mut app = app_with(numbered(25)).await;
    app.go_to(usize::MAX);
    let view = app.view();
    assert!(view.items.is_empty());
    assert_eq!(view.total_pages, 3);
    let pager = view.pager.expect("three pages need a pager");
    assert_eq!(pager.buttons.len(), 3);
    assert!(pager.buttons.iter().all(|b| !b.current));
}

// ─── Capture, edit, delete, open ───

#[tokio::test]
async fn test_capture_shows_up_in_filtered_view() {
    let mut app = app_with(vec![]).await;
    let host = FakeHost {
        tab: Some(ActiveTab {
            url: "https://example.com/page".to_string(),
            title: None,
        }),
        ..Default::default()
    };

    let bookmark = app.capture(&host).await.unwrap();
    assert_eq!(bookmark.title, "example.com");
    let view = app.view();
    assert_eq!(view.count_text, "1 bookmarks");
    assert_eq!(view.items[0].id, bookmark.id);
    assert_eq!(
        view.items[0].favicon.as_deref(),
        Some("https://www.google.com/s2/favicons?domain=example.com&sz=16")
    );
}

#[tokio::test]
async fn test_capture_errors_are_surfaced() {
    let mut app = app_with(vec![]).await;

    let err = app.capture(&FakeHost::default()).await.unwrap_err();
    assert_eq!(err, TabActionError::Tab(TabError::NoActiveTab));

    let bad = FakeHost {
        tab: Some(ActiveTab {
            url: "chrome garbage".to_string(),
            title: None,
        }),
        ..Default::default()
    };
    let err = app.capture(&bad).await.unwrap_err();
    assert!(matches!(
        err,
        TabActionError::Bookmark(BookmarkError::InvalidUrl(_))
    ));
    assert!(app.bookmarks().is_empty());
}

#[tokio::test]
async fn test_edit_refilters_current_query() {
    let list = numbered(3);
    let target = list[0].id.clone();
    let mut app = app_with(list).await;

    app.search("site 0");
    assert_eq!(app.filtered().len(), 1);

    assert!(app
        .save_edit(&target, "https://renamed.com", "Renamed")
        .await
        .unwrap());
    assert!(app.filtered().is_empty());
    assert_eq!(app.view().count_text, "0 of 3");
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let list = numbered(2);
    let target = list[1].id.clone();
    let mut app = app_with(list).await;

    assert!(app.delete(&target).await.unwrap());
    assert!(!app.delete(&target).await.unwrap());
    assert_eq!(app.view().total, 1);
}

#[tokio::test]
async fn test_open_foreground_and_background() {
    let list = numbered(1);
    let id = list[0].id.clone();
    let app = app_with(list).await;
    let mut host = FakeHost::default();

    app.open(&mut host, &id, false).unwrap();
    app.open(&mut host, &id, true).unwrap();
    assert_eq!(
        host.opened,
        vec![
            ("https://site0.com".to_string(), true),
            ("https://site0.com".to_string(), false)
        ]
    );

    let err = app.open(&mut host, "missing", false).unwrap_err();
    assert!(matches!(
        err,
        TabActionError::Bookmark(BookmarkError::NotFound(_))
    ));
}

// ─── Import / export / stats ───

#[tokio::test]
async fn test_import_replaces_collection() {
    let mut app = app_with(numbered(5)).await;
    app.search("site");
    app.go_to(2);

    let count = app
        .import_csv(Some("url;title;tags;created_at\nhttps://a.com;A;x;100\nhttps://b.com;B;;200"))
        .await
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(import_status(count), "Successfully imported 2 bookmarks!");

    let view = app.view();
    assert_eq!(view.page, 1);
    assert_eq!(view.total, 2);
}

#[tokio::test]
async fn test_import_failures_keep_collection() {
    let mut app = app_with(numbered(2)).await;

    assert_eq!(app.import_csv(None).await, Err(ImportError::NoFileSelected));
    assert_eq!(
        app.import_csv(Some("url;title;tags;created_at\n;no url;;1")).await,
        Err(ImportError::ImportParseEmpty)
    );
    assert_eq!(app.bookmarks().len(), 2);
}

#[tokio::test]
async fn test_export_round_trips_through_import() {
    let app = app_with(numbered(3)).await;
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let file = app.export_csv_on(date).unwrap();

    assert_eq!(file.filename, "pocket-export-2024-06-01.csv");
    assert_eq!(file.count, 3);
    assert_eq!(export_status(file.count), "Exported 3 bookmarks successfully!");

    let mut other = app_with(vec![]).await;
    other.import_csv(Some(file.contents.as_str())).await.unwrap();
    let urls: Vec<&str> = other.bookmarks().iter().map(|b| b.url.as_str()).collect();
    let original: Vec<&str> = app.bookmarks().iter().map(|b| b.url.as_str()).collect();
    assert_eq!(urls, original);
}

#[tokio::test]
async fn test_export_empty_is_error() {
    let app = app_with(vec![]).await;
    assert_eq!(app.export_csv(), Err(ExportError::NothingToExport));
}

#[tokio::test]
async fn test_stats_reports_oldest() {
    let app = app_with(vec![
        Bookmark::new("https://a.com", "A", "", 1_700_000_000),
        Bookmark::new("https://b.com", "B", "", 86_400),
    ])
    .await;
    let stats = app.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.oldest_text(), "1970-01-02");

    let empty = app_with(vec![]).await.stats();
    assert_eq!(empty.oldest_text(), "N/A");
}
