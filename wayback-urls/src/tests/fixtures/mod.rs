use std::fs;
use std::path::Path;

/// Load a saved CDX response body by file name
pub fn load_cdx_fixture(fixture_name: &str) -> String {
    let path = Path::new("src/tests/fixtures").join(fixture_name);
    fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Failed to load test fixture: {}", fixture_name))
}
