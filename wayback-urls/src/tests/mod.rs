use serde_json::json;

pub mod cdx_tests;
pub mod fixtures;

/// Build a CDX JSON body: the `original` header row followed by one row per record.
pub fn json_page(records: &[&str]) -> String {
    let mut rows = vec![json!(["original"])];
    rows.extend(records.iter().map(|record| json!([record])));
    serde_json::Value::Array(rows).to_string()
}
