use super::Store;
use crate::error::AppError;
use crate::ingest::aggregate::Totals;
use crate::ingest::parser::SpreadsheetRow;
use rusqlite::params;

fn to_sql_count(value: u64, what: &str) -> Result<i64, AppError> {
    i64::try_from(value).map_err(|_| AppError::InvalidFormat(format!("{what} is too large")))
}

fn to_sql_total(value: f64, what: &str) -> Result<f64, AppError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AppError::InvalidFormat(format!("{what} is too large")))
    }
}

impl Store {
    /// Swaps the stored dataset for `rows` and one snapshot of `totals`.
    ///
    /// Runs in a single transaction: every cafe and insights row is deleted,
    /// the new cafes are inserted with zeroed metrics, then the snapshot is
    /// inserted. Any error rolls the whole swap back.
    pub fn replace_dataset(
        &self,
        rows: &[SpreadsheetRow],
        totals: &Totals,
        source_md5: &str,
    ) -> Result<usize, AppError> {
        let total_cups = to_sql_count(totals.cups_recycled, "total cups recycled")?;
        let total_co2 = to_sql_total(totals.co2_saved, "total co2Saved")?;
        let total_waste = to_sql_total(totals.waste_diverted, "total wasteDiverted")?;

        let mut conn = self.lock()?;
        // Dropped without commit on any early return, which rolls back.
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM cafes", [])?;
        tx.execute("DELETE FROM insights", [])?;

        {
            let mut insert = tx.prepare(
                "INSERT INTO cafes (
                    name, location, cups_recycled, recycling_rate, trend, website,
                    waste_reduction, compost_produced, contamination_rate, rank
                 ) VALUES (?1, ?2, ?3, 0, 0, '', 0, 0, 0, 0)",
            )?;
            for row in rows {
                let cups = to_sql_count(row.cups_recycled, "cups recycled")?;
                insert.execute(params![row.name, row.location, cups])?;
            }
        }

        tx.execute(
            "INSERT INTO insights (cups_recycled, co2_saved, waste_diverted, source_md5)
             VALUES (?1, ?2, ?3, ?4)",
            params![total_cups, total_co2, total_waste, source_md5],
        )?;

        tx.commit()?;
        Ok(rows.len())
    }
}
