use crate::model::cafe::CafeRecord;
use serde::{Deserialize, Serialize};

/// The ranked view shown on the dashboard, with its summary stat cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSummary {
    pub total_cafes: usize,
    pub total_cups: u64,
    /// Mean `recycling_rate` across the ranked cafes, 0 when there are none.
    pub average_rate: f64,
    pub top_performer: Option<String>,
    pub top_performer_rate: Option<f64>,
    /// Cafes ordered by cups recycled, with `rank` starting at 1.
    pub rankings: Vec<CafeRecord>,
}
