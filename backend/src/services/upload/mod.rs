//! Spreadsheet ingest over HTTP.
//!
//! - `POST /api/upload`: requires `Authorization: Bearer <API_SECRET_KEY>` and a
//!   multipart `file` field holding an `.xlsx` workbook. The file is staged
//!   under the configured temp directory, its first sheet parsed, and the
//!   stored cafes and insights replaced in one transaction. The staged file is
//!   removed on every exit path.

mod auth;
mod staging;
mod spreadsheet;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/upload";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", post().to(spreadsheet::process))
}
