//! Search over the bookmark list.
//!
//! A query matches a bookmark when its lower-cased title, URL or tags contain
//! the lower-cased query. Results are always newest first by `created_at`.
//! The whole collection is rescanned on every call.

use crate::types::bookmark::Bookmark;

/// Returns the bookmarks matching `query`, newest first.
///
/// An empty query keeps every bookmark.
pub fn filter(bookmarks: &[Bookmark], query: &str) -> Vec<Bookmark> {
    let query = query.to_lowercase();

    let mut matches: Vec<Bookmark> = if query.is_empty() {
        bookmarks.to_vec()
    } else {
        bookmarks
            .iter()
            .filter(|b| matches(b, &query))
            .cloned()
            .collect()
    };

    sort_newest_first(&mut matches);
    matches
}

/// `query` must already be lower-cased.
fn matches(bookmark: &Bookmark, query: &str) -> bool {
    bookmark.title.to_lowercase().contains(query)
        || bookmark.url.to_lowercase().contains(query)
        || bookmark.tags.to_lowercase().contains(query)
}

/// Stable sort, descending by `created_at`.
pub fn sort_newest_first(bookmarks: &mut [Bookmark]) {
    bookmarks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
