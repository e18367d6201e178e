// Test Support
// Fixture paths and input files shared by the integration tests

#![allow(dead_code)]

use std::path::Path;

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

/// Write `body` to `dir/name` and return the path as a string.
pub fn write_input(dir: &Path, name: &str, body: &[u8]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path.to_str().unwrap().to_string()
}
