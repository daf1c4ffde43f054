//! `GET /api/leaderboard[?location=...]`: the dashboard's ranked table and
//! stat cards, computed from the stored cafes on each request.

mod summary;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/leaderboard";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(summary::process))
}
