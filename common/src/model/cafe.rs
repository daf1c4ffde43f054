use serde::{Deserialize, Serialize};

/// The current snapshot of one participating cafe.
///
/// Every successful upload replaces the whole set of cafes: rows are never
/// merged by key. Only `name`, `location` and `cups_recycled` come from the
/// uploaded spreadsheet; the remaining metrics start at zero and `website`
/// starts empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CafeRecord {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub recycling_rate: f64,
    pub cups_recycled: u64,
    pub trend: f64,
    pub website: String,
    pub waste_reduction: f64,
    pub compost_produced: f64,
    pub contamination_rate: f64,
    /// Display position. Stored as zero; the leaderboard computes it on read.
    pub rank: u32,
}
