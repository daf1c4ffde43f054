//! HTTP surface. Each area exposes a `configure_routes()` scope and one
//! `process` handler per endpoint.

pub mod cafes;
pub mod insights;
pub mod leaderboard;
pub mod upload;

use actix_web::web;

/// Registers every API scope. Shared by `main.rs` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(cafes::configure_routes())
        .service(insights::configure_routes())
        .service(leaderboard::configure_routes())
        .service(upload::configure_routes());
}
