use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::model::cafe::CafeRecord;
use common::model::leaderboard::LeaderboardSummary;
use serde::Deserialize;

/// Location filter value the dashboard sends for "no filter".
const ALL_LOCATIONS: &str = "All Locations";

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub location: Option<String>,
}

pub(crate) async fn process(
    state: web::Data<AppState>,
    query: web::Query<LeaderboardQuery>,
) -> impl Responder {
    match leaderboard(&state, query.into_inner()).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => e.respond("Failed to fetch leaderboard"),
    }
}

async fn leaderboard(
    state: &AppState,
    query: LeaderboardQuery,
) -> Result<LeaderboardSummary, AppError> {
    let store = state.store.clone();
    let cafes = web::block(move || store.list_cafes()).await??;
    Ok(rank_cafes(cafes, query.location.as_deref()))
}

fn location_filter(location: Option<&str>) -> Option<&str> {
    location
        .map(str::trim)
        .filter(|loc| !loc.is_empty())
        .filter(|loc| !loc.eq_ignore_ascii_case(ALL_LOCATIONS) && !loc.eq_ignore_ascii_case("all"))
}

/// Filters by location (case-insensitive), orders by cups recycled and
/// assigns 1-based ranks. The stored `rank` column is not touched.
pub fn rank_cafes(cafes: Vec<CafeRecord>, location: Option<&str>) -> LeaderboardSummary {
    let filter = location_filter(location);
    let mut rankings: Vec<CafeRecord> = cafes
        .into_iter()
        .filter(|cafe| filter.map_or(true, |loc| cafe.location.eq_ignore_ascii_case(loc)))
        .collect();

    // stable: equal counts keep store order
    rankings.sort_by(|a, b| b.cups_recycled.cmp(&a.cups_recycled));
    for (idx, cafe) in rankings.iter_mut().enumerate() {
        cafe.rank = idx as u32 + 1;
    }

    let total_cups = rankings
        .iter()
        .fold(0u64, |sum, cafe| sum.saturating_add(cafe.cups_recycled));
    let average_rate = if rankings.is_empty() {
        0.0
    } else {
        rankings.iter().map(|cafe| cafe.recycling_rate).sum::<f64>() / rankings.len() as f64
    };
    let top = rankings.first();

    LeaderboardSummary {
        total_cafes: rankings.len(),
        total_cups,
        average_rate,
        top_performer: top.map(|cafe| cafe.name.clone()),
        top_performer_rate: top.map(|cafe| cafe.recycling_rate),
        rankings,
    }
}
