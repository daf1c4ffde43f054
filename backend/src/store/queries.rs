use super::Store;
use crate::error::AppError;
use common::model::cafe::CafeRecord;
use common::model::insights::InsightsSnapshot;
use rusqlite::{OptionalExtension, Row};

/// Reads an INTEGER column that must be non-negative.
fn get_count(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, value))
}

fn map_cafe(row: &Row<'_>) -> rusqlite::Result<CafeRecord> {
    Ok(CafeRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
        recycling_rate: row.get(3)?,
        cups_recycled: get_count(row, 4)?,
        trend: row.get(5)?,
        website: row.get(6)?,
        waste_reduction: row.get(7)?,
        compost_produced: row.get(8)?,
        contamination_rate: row.get(9)?,
        rank: row.get(10)?,
    })
}

impl Store {
    /// All cafes, most cups recycled first. Ties keep upload order.
    pub fn list_cafes(&self) -> Result<Vec<CafeRecord>, AppError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, location, recycling_rate, cups_recycled, trend, website,
                    waste_reduction, compost_produced, contamination_rate, rank
             FROM cafes
             ORDER BY cups_recycled DESC, id ASC",
        )?;
        let cafes = stmt
            .query_map([], map_cafe)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cafes)
    }

    /// The snapshot with the highest id, if any upload has happened.
    pub fn latest_insights(&self) -> Result<Option<InsightsSnapshot>, AppError> {
        let conn = self.lock()?;
        let snapshot = conn
            .query_row(
                "SELECT id, cups_recycled, co2_saved, waste_diverted, source_md5, date
                 FROM insights
                 ORDER BY id DESC
                 LIMIT 1",
                [],
                |row| {
                    Ok(InsightsSnapshot {
                        id: Some(row.get(0)?),
                        cups_recycled: get_count(row, 1)?,
                        co2_saved: row.get(2)?,
                        waste_diverted: row.get(3)?,
                        source_md5: row.get(4)?,
                        date: Some(row.get(5)?),
                    })
                },
            )
            .optional()?;
        Ok(snapshot)
    }
}
