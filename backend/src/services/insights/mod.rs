//! `GET /api/insights`: the most recent program-wide totals.

mod latest;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/insights";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(latest::process))
}
