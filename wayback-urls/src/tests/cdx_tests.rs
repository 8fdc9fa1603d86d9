use super::fixtures;
use crate::cdx::{parse_json_page, parse_page, parse_text_page};
use crate::error::PageError;
use crate::query::ResponseFormat;

const GEOCITIES: [&str; 3] = [
    "http://www.geocities.com:80/",
    "http://www.geocities.com/Area51/Vault/1234/index.html",
    "http://www.geocities.com/SiliconValley/Lakes/7777/links.html?sort=name,date",
];

#[test]
fn test_json_page_from_fixture() {
    let body = fixtures::load_cdx_fixture("geocities_page.json");
    let page = parse_page(&body, ResponseFormat::Json).unwrap();

    assert_eq!(page.records, GEOCITIES);
    assert_eq!(page.last(), Some(GEOCITIES[2]));
}

#[test]
fn test_text_page_from_fixture() {
    let body = fixtures::load_cdx_fixture("geocities_page.txt");
    let page = parse_page(&body, ResponseFormat::Text).unwrap();

    assert_eq!(page.records, GEOCITIES);
}

#[test]
fn test_header_only_and_empty_bodies_are_empty_pages() {
    let body = fixtures::load_cdx_fixture("header_only.json");
    assert!(parse_json_page(&body).unwrap().is_empty());
    assert!(parse_json_page("[]").unwrap().is_empty());
    assert!(parse_json_page("\n").unwrap().is_empty());

    assert!(parse_text_page("").is_empty());
    assert!(parse_text_page("original\n").is_empty());
}

#[test]
fn test_records_are_not_normalized() {
    let page = parse_json_page(r#"[["original"],["HTTP://Example.COM:80/a b"],["http://example.com/%7E"]]"#)
        .unwrap();
    assert_eq!(
        page.records,
        vec!["HTTP://Example.COM:80/a b", "http://example.com/%7E"]
    );
}

#[test]
fn test_only_first_field_of_a_row_is_kept() {
    let page = parse_json_page(r#"[["original","timestamp"],["http://a.com/","20200101000000"]]"#)
        .unwrap();
    assert_eq!(page.records, vec!["http://a.com/"]);
}

#[test]
fn test_malformed_json_is_an_error() {
    let err = parse_json_page("<html>Service Unavailable</html>").unwrap_err();
    assert!(matches!(err, PageError::Malformed { .. }));

    let err = parse_json_page(r#"{"original": "http://a.com/"}"#).unwrap_err();
    assert!(matches!(err, PageError::Malformed { .. }));

    let err = parse_json_page(r#"[["original"],[]]"#).unwrap_err();
    assert!(err.to_string().contains("row 1 has no fields"));
}

#[test]
fn test_text_only_drops_a_leading_header() {
    let page = parse_text_page("http://a.com/\r\noriginal\n");
    assert_eq!(page.records, vec!["http://a.com/", "original"]);
}
