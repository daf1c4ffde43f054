//! `GET /api/cafes`: every stored cafe, most cups recycled first.

mod list;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/cafes";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(list::process))
}
