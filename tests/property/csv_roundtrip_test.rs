//! Property-based tests for the CSV codec.
//!
//! Exporting a collection and importing the result gives back the same
//! bookmarks, in the same order, as long as no field contains the delimiter
//! or a line break. Ids are regenerated on import and are not compared.

use pocketcsv::services::csv_codec::{decode, decode_at, encode, CSV_HEADER};
use pocketcsv::types::bookmark::Bookmark;
use proptest::prelude::*;

fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".dev")],
        proptest::option::of("/[a-z0-9_-]{1,12}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

/// Non-blank and already trimmed, so decoding keeps it as-is.
fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 .,!-]{0,30}[a-zA-Z0-9]"
}

fn arb_tags() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z]{1,8}(,[a-z]{1,8}){0,3}"]
}

fn arb_bookmark() -> impl Strategy<Value = Bookmark> {
    (arb_url(), arb_title(), arb_tags(), 0i64..4_000_000_000)
        .prop_map(|(url, title, tags, created_at)| Bookmark::new(url, title, tags, created_at))
}

fn without_ids(bookmarks: &[Bookmark]) -> Vec<(String, String, String, i64)> {
    bookmarks
        .iter()
        .map(|b| (b.url.clone(), b.title.clone(), b.tags.clone(), b.created_at))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_export_then_import_preserves_fields(
        bookmarks in proptest::collection::vec(arb_bookmark(), 0..30)
    ) {
        let decoded = decode(&encode(&bookmarks));
        prop_assert_eq!(without_ids(&decoded), without_ids(&bookmarks));
    }

    #[test]
    fn prop_encoded_line_count(
        bookmarks in proptest::collection::vec(arb_bookmark(), 0..30)
    ) {
        let text = encode(&bookmarks);
        prop_assert!(text.starts_with(CSV_HEADER));
        prop_assert_eq!(text.lines().count(), bookmarks.len() + 1);
    }

    #[test]
    fn prop_semicolons_in_title_become_commas(
        url in arb_url(),
        head in "[a-z]{1,8}",
        tail in "[a-z]{1,8}",
    ) {
        let b = Bookmark::new(url, format!("{};{}", head, tail), "", 1);
        let decoded = decode(&encode(&[b]));
        prop_assert_eq!(decoded.len(), 1);
        prop_assert_eq!(&decoded[0].title, &format!("{},{}", head, tail));
    }

    #[test]
    fn prop_decode_never_yields_empty_urls(text in "[a-z;\n ]{0,200}") {
        for b in decode_at(&text, 0) {
            prop_assert!(!b.url.is_empty());
            prop_assert!(!b.title.is_empty());
        }
    }
}
