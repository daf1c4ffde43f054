use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::model::insights::InsightsSnapshot;

/// Returns the newest snapshot. Before the first upload this is a zero-valued
/// object rather than an error or an empty body.
pub(crate) async fn process(state: web::Data<AppState>) -> impl Responder {
    match latest_insights(&state).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => e.respond("Failed to fetch insights"),
    }
}

async fn latest_insights(state: &AppState) -> Result<InsightsSnapshot, AppError> {
    let store = state.store.clone();
    let latest = web::block(move || store.latest_insights()).await??;
    Ok(latest.unwrap_or_default())
}
