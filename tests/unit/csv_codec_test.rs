//! Unit tests for the CSV codec: header handling, defaults and the
//! documented delimiter limitations.

use chrono::NaiveDate;
use rstest::rstest;

use pocketcsv::services::csv_codec::{decode, decode_at, encode, export_filename, CSV_HEADER};
use pocketcsv::types::bookmark::{unix_now, Bookmark};

#[test]
fn test_decode_skips_empty_url_rows() {
    let decoded = decode("url;title;tags;created_at\nhttps://a.com;A;;100\n;B;;200\n");
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].url, "https://a.com");
    assert_eq!(decoded[0].title, "A");
    assert_eq!(decoded[0].tags, "");
    assert_eq!(decoded[0].created_at, 100);
}

#[rstest]
#[case("")]
#[case("url;title;tags;created_at")]
#[case("url;title;tags;created_at\n")]
#[case("url;title;tags;created_at\n\n   \n")]
#[case("url;title;tags;created_at\n  ;x;y;1")]
fn test_decode_yields_nothing(#[case] input: &str) {
    assert!(decode(input).is_empty());
}

#[rstest]
#[case("h\nhttps://a.com;T;tag;12", "T", "tag", 12)]
#[case("h\nhttps://a.com;;;12", "https://a.com", "", 12)]
#[case("h\n  https://a.com  ;  T  ;  tag  ;  12  ", "T", "tag", 12)]
#[case("h\nhttps://a.com;T", "T", "", 555)]
#[case("h\nhttps://a.com;T;tag;12abc", "T", "tag", 555)]
#[case("h\nhttps://a.com;T;tag;-4", "T", "tag", -4)]
fn test_decode_field_defaults(
    #[case] input: &str,
    #[case] title: &str,
    #[case] tags: &str,
    #[case] created_at: i64,
) {
    let decoded = decode_at(input, 555);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].url, "https://a.com");
    assert_eq!(decoded[0].title, title);
    assert_eq!(decoded[0].tags, tags);
    assert_eq!(decoded[0].created_at, created_at);
}

/// A missing timestamp falls back to "now", not to zero.
#[test]
fn test_decode_missing_timestamp_uses_current_time() {
    let before = unix_now();
    let decoded = decode("h\nhttps://a.com;A");
    let after = unix_now();
    assert!(decoded[0].created_at >= before && decoded[0].created_at <= after);
}

#[test]
fn test_encode_preserves_input_order() {
    let list = vec![
        Bookmark::new("https://b.com", "B", "x", 1),
        Bookmark::new("https://a.com", "A", "", 2),
    ];
    let csv = encode(&list);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines[1], "https://b.com;B;x;1");
    assert_eq!(lines[2], "https://a.com;A;;2");
}

/// The title's `;` becomes `,`; a `;` in tags shifts the columns on re-import.
#[test]
fn test_semicolon_limitations_are_preserved() {
    let list = vec![Bookmark::new("https://a.com", "Rock; Roll", "a;b", 7)];
    let decoded = decode_at(&encode(&list), 0);
    assert_eq!(decoded[0].title, "Rock, Roll");
    assert_eq!(decoded[0].tags, "a");
    assert_eq!(decoded[0].created_at, 0);
}

#[test]
fn test_export_filename_pads_date() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    assert_eq!(export_filename("bm", date), "bm-2025-01-02.csv");
}
