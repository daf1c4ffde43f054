use serde::{Deserialize, Serialize};

/// Program-wide totals computed from the most recent upload.
///
/// `id`, `date` and `source_md5` are only present for a stored snapshot. The
/// zero-valued default returned before the first upload carries the three
/// totals alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsSnapshot {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    pub cups_recycled: u64,
    pub co2_saved: f64,
    pub waste_diverted: f64,
    /// MD5 of the spreadsheet bytes the totals were computed from.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source_md5: Option<String>,
    /// SQLite timestamp (`YYYY-MM-DD HH:MM:SS`, UTC) of the upload.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date: Option<String>,
}
