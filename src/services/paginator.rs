//! Page math for the bookmark list and its pager control.
//!
//! Pages are 1-indexed throughout.

use serde::Serialize;

/// Number of page buttons shown by default.
pub const DEFAULT_MAX_VISIBLE: usize = 5;

/// `ceil(total / per_page)`. Zero items, or a zero page size, is zero pages.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Items on `page`. Pages past the end (and page 0) are empty.
pub fn page_slice<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if page == 0 || per_page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

/// Inclusive range of page numbers to show, centred on `current`.
///
/// Near the last page the window slides left so that `max_visible` numbers
/// are still shown when there are that many pages. A `current` past the last
/// page is treated like the last page. With no pages, or `max_visible == 0`,
/// the range is empty (`end < start`).
pub fn visible_window(current: usize, total_pages: usize, max_visible: usize) -> (usize, usize) {
    if max_visible == 0 {
        return (1, 0);
    }
    // Distance from the first to the last visible number.
    let span = max_visible - 1;

    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = total_pages.min(start.saturating_add(span));

    if end < start || end - start < span {
        start = end.saturating_sub(span).max(1);
    }
    (start, end)
}

/// One numbered pager button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageButton {
    pub number: usize,
    pub current: bool,
}

/// Pager control model: first/prev, numbered buttons, next/last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub current: usize,
    pub total_pages: usize,
    pub first_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
    pub buttons: Vec<PageButton>,
}

/// Builds the pager, or `None` when everything fits on one page.
pub fn pager(current: usize, total_pages: usize, max_visible: usize) -> Option<Pager> {
    if total_pages <= 1 {
        return None;
    }

    let (start, end) = visible_window(current, total_pages, max_visible);
    let buttons = (start..=end)
        .map(|number| PageButton {
            number,
            current: number == current,
        })
        .collect();

    Some(Pager {
        current,
        total_pages,
        first_enabled: current != 1,
        prev_enabled: current != 1,
        next_enabled: current != total_pages,
        last_enabled: current != total_pages,
        buttons,
    })
}
