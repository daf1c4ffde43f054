//! Fixtures shared by the handler and parser tests.

use crate::config::Config;
use crate::state::AppState;
use crate::store::Store;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::TempDir;

const HEADERS: [&str; 5] = ["name", "location", "cupsRecycled", "co2Saved", "wasteDiverted"];
const BOUNDARY: &str = "----leaderboard-test-boundary";

/// In-memory store plus a private staging directory. Keep the `TempDir`
/// alive for the duration of the test.
pub fn test_state(secret: Option<&str>) -> (AppState, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_path: ":memory:".to_string(),
        temp_dir: dir.path().join("uploads"),
        max_upload_bytes: 1024 * 1024,
        api_secret_key: secret.map(str::to_string),
    };
    let store = Store::open_in_memory().expect("open in-memory store");
    (AppState::new(store, config), dir)
}

pub struct SheetRow {
    name: String,
    location: String,
    cups: f64,
    co2: f64,
    waste: f64,
}

impl SheetRow {
    pub fn new(name: &str, location: &str, cups: f64, co2: f64, waste: f64) -> Self {
        Self {
            name: name.to_string(),
            location: location.to_string(),
            cups,
            co2,
            waste,
        }
    }
}

/// Builds an `.xlsx` whose first sheet holds `rows` under the standard
/// headers. A second sheet with unrelated data checks that only the first is
/// read.
pub fn workbook_bytes(rows: &[SheetRow]) -> Vec<u8> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    for (col, title) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *title).expect("write header");
    }
    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, &row.name).expect("write name");
        sheet.write_string(r, 1, &row.location).expect("write location");
        sheet.write_number(r, 2, row.cups).expect("write cups");
        sheet.write_number(r, 3, row.co2).expect("write co2");
        sheet.write_number(r, 4, row.waste).expect("write waste");
    }

    let archive = workbook.add_worksheet();
    archive.write_string(0, 0, "archived").expect("write archive");
    archive.write_number(1, 0, 12345).expect("write archive");

    workbook.save_to_buffer().expect("serialize workbook")
}

/// A single-field `multipart/form-data` body and its content type.
pub fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> (String, Vec<u8>) {
    let disposition = match filename {
        Some(filename) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, filename),
        None => format!("form-data; name=\"{}\"", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: {}\r\nContent-Type: application/octet-stream\r\n\r\n",
            BOUNDARY, disposition
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// Number of entries left in the staging directory (0 if it was never created).
pub fn staged_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
