//! The spreadsheet ingest pipeline: parse, aggregate, replace.
//!
//! [`ingest_file`] is synchronous. The upload handler runs it on actix's
//! blocking pool once the multipart field has been staged to disk.

pub mod aggregate;
pub mod parser;

use crate::error::AppError;
use crate::store::Store;
use log::info;
use std::path::Path;

/// Parses the staged workbook at `path` and replaces the stored dataset with
/// its rows. Returns the number of rows written.
pub fn ingest_file(store: &Store, path: &Path, source_md5: &str) -> Result<usize, AppError> {
    let rows = parser::read_first_sheet(path)?;
    let totals = aggregate::aggregate(&rows);
    let written = store.replace_dataset(&rows, &totals, source_md5)?;

    info!(
        "Replaced dataset with {} cafes ({} cups, {} CO2 saved, {} waste diverted)",
        written, totals.cups_recycled, totals.co2_saved, totals.waste_diverted
    );
    Ok(written)
}
