use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::model::cafe::CafeRecord;

/// Returns `200 OK` with a JSON array of cafes (possibly empty), or `500`
/// when the store cannot be read.
pub(crate) async fn process(state: web::Data<AppState>) -> impl Responder {
    match list_cafes(&state).await {
        Ok(cafes) => HttpResponse::Ok().json(cafes),
        Err(e) => e.respond("Failed to fetch cafes"),
    }
}

async fn list_cafes(state: &AppState) -> Result<Vec<CafeRecord>, AppError> {
    let store = state.store.clone();
    web::block(move || store.list_cafes()).await?
}
