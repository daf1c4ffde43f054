use crate::ingest::parser::SpreadsheetRow;

/// Program-wide sums for one upload.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub cups_recycled: u64,
    pub co2_saved: f64,
    pub waste_diverted: f64,
}

/// Folds the rows into their three sums, starting from zero.
pub fn aggregate(rows: &[SpreadsheetRow]) -> Totals {
    rows.iter().fold(Totals::default(), |acc, row| Totals {
        cups_recycled: acc.cups_recycled.saturating_add(row.cups_recycled),
        co2_saved: acc.co2_saved + row.co2_saved,
        waste_diverted: acc.waste_diverted + row.waste_diverted,
    })
}
