//! Semicolon-delimited CSV codec for bookmark import/export.
//!
//! Format: one header line `url;title;tags;created_at`, then one record per
//! line. Fields are never quoted. A `;` inside a title is written as `,`; the
//! other columns are written verbatim, so a `;` in a URL or tag list produces a
//! row that will not read back correctly.

use chrono::NaiveDate;

use crate::types::bookmark::{unix_now, Bookmark};

/// Header line written by [`encode`]. [`decode`] skips the first line without
/// checking it.
pub const CSV_HEADER: &str = "url;title;tags;created_at";

const DELIMITER: char = ';';

/// Encodes bookmarks in input order.
pub fn encode(bookmarks: &[Bookmark]) -> String {
    let rows: Vec<String> = bookmarks
        .iter()
        .map(|b| {
            format!(
                "{url}{d}{title}{d}{tags}{d}{created_at}",
                url = b.url,
                title = b.title.replace(DELIMITER, ","),
                tags = b.tags,
                created_at = b.created_at,
                d = DELIMITER,
            )
        })
        .collect();

    format!("{}\n{}", CSV_HEADER, rows.join("\n"))
}

/// Decodes CSV text, stamping rows without a usable timestamp with the
/// current time.
pub fn decode(text: &str) -> Vec<Bookmark> {
    decode_at(text, unix_now())
}

/// Decodes CSV text, using `now` for rows whose `created_at` is missing or
/// not an integer.
///
/// Rows with an empty URL are skipped. Every decoded bookmark gets a fresh id.
pub fn decode_at(text: &str, now: i64) -> Vec<Bookmark> {
    text.split('\n')
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| decode_line(line, now))
        .collect()
}

fn decode_line(line: &str, now: i64) -> Option<Bookmark> {
    let mut fields = line.split(DELIMITER).map(str::trim);

    let url = fields.next().filter(|u| !u.is_empty())?;
    let title = match fields.next() {
        Some(t) if !t.is_empty() => t,
        _ => url,
    };
    let tags = fields.next().unwrap_or("");
    let created_at = fields
        .next()
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(now);

    Some(Bookmark::new(url, title, tags, created_at))
}

/// Download filename for an export made on `date`, e.g.
/// `pocket-export-2024-03-09.csv`.
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", prefix, date.format("%Y-%m-%d"))
}
