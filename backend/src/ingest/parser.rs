//! Turns the first sheet of an uploaded `.xlsx` workbook into typed rows.
//!
//! The first non-blank row is the header. Columns are matched by header text,
//! ignoring case, spaces, underscores and hyphens, so `Cups Recycled`,
//! `cups_recycled` and `cupsRecycled` all name the same column. Extra columns
//! are ignored and blank rows are skipped.
//!
//! Every data row must be complete: a non-empty `name` and `location`, a
//! non-negative whole number for `cupsRecycled` and finite numbers for
//! `co2Saved` and `wasteDiverted`. The first violation fails the whole sheet
//! with `InvalidFormat`, naming the sheet row and column.

use crate::error::AppError;
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::path::Path;

/// One data row of an uploaded spreadsheet. Never stored as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetRow {
    pub name: String,
    pub location: String,
    pub cups_recycled: u64,
    pub co2_saved: f64,
    pub waste_diverted: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Location,
    CupsRecycled,
    Co2Saved,
    WasteDiverted,
}

impl Column {
    const ALL: [Column; 5] = [
        Column::Name,
        Column::Location,
        Column::CupsRecycled,
        Column::Co2Saved,
        Column::WasteDiverted,
    ];

    fn title(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Location => "location",
            Column::CupsRecycled => "cupsRecycled",
            Column::Co2Saved => "co2Saved",
            Column::WasteDiverted => "wasteDiverted",
        }
    }

    fn from_header(raw: &str) -> Option<Column> {
        let key = normalize_header(raw);
        Column::ALL
            .into_iter()
            .find(|col| normalize_header(col.title()) == key)
    }
}

fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Reads the first worksheet of the workbook at `path`.
pub fn read_first_sheet(path: &Path) -> Result<Vec<SpreadsheetRow>, AppError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::InvalidFormat("the workbook has no worksheets".into()))??;

    // Range coordinates are 0-based; report 1-based sheet rows.
    let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    parse_rows(range.rows(), first_row)
}

/// Maps header-plus-data rows into `SpreadsheetRow`s.
///
/// `first_row` is the sheet row number of the first item, used in messages.
pub fn parse_rows<'a, I>(rows: I, first_row: usize) -> Result<Vec<SpreadsheetRow>, AppError>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows
        .into_iter()
        .enumerate()
        .map(|(idx, cells)| (first_row + idx, cells))
        .filter(|(_, cells)| !is_blank(cells));

    let Some((_, header)) = rows.next() else {
        return Err(AppError::InvalidFormat("the first sheet is empty".into()));
    };
    let positions = header_positions(header)?;

    let parsed = rows
        .map(|(row_number, cells)| parse_row(row_number, cells, &positions))
        .collect::<Result<Vec<_>, _>>()?;

    if parsed.is_empty() {
        return Err(AppError::InvalidFormat(
            "the first sheet contains no data rows".into(),
        ));
    }
    Ok(parsed)
}

fn is_blank(cells: &[Data]) -> bool {
    cells.iter().all(|cell| match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

/// Column index of each expected field, in `Column::ALL` order.
fn header_positions(header: &[Data]) -> Result<[usize; 5], AppError> {
    let mut positions: [Option<usize>; 5] = [None; 5];
    for (idx, cell) in header.iter().enumerate() {
        let Data::String(title) = cell else { continue };
        if let Some(col) = Column::from_header(title) {
            let slot = &mut positions[col as usize];
            // duplicate headers: first wins
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
    }

    let mut resolved = [0usize; 5];
    for col in Column::ALL {
        resolved[col as usize] = positions[col as usize].ok_or_else(|| {
            AppError::InvalidFormat(format!("missing column '{}'", col.title()))
        })?;
    }
    Ok(resolved)
}

fn parse_row(
    row_number: usize,
    cells: &[Data],
    positions: &[usize; 5],
) -> Result<SpreadsheetRow, AppError> {
    let cell = |col: Column| {
        cells
            .get(positions[col as usize])
            .cloned()
            .unwrap_or(Data::Empty)
    };
    let invalid = |col: Column, expected: &str| {
        AppError::InvalidFormat(format!(
            "row {}: '{}' must be {}",
            row_number,
            col.title(),
            expected
        ))
    };

    let text = |col: Column| cell_text(&cell(col)).ok_or_else(|| invalid(col, "non-empty text"));
    let number = |col: Column| cell_number(&cell(col)).ok_or_else(|| invalid(col, "a number"));

    Ok(SpreadsheetRow {
        name: text(Column::Name)?,
        location: text(Column::Location)?,
        cups_recycled: cell_count(&cell(Column::CupsRecycled))
            .ok_or_else(|| invalid(Column::CupsRecycled, "a non-negative whole number"))?,
        co2_saved: number(Column::Co2Saved)?,
        waste_diverted: number(Column::WasteDiverted)?,
    })
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn cell_number(cell: &Data) -> Option<f64> {
    let value = match cell {
        Data::Int(i) => *i as f64,
        Data::Float(f) => *f,
        Data::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn cell_count(cell: &Data) -> Option<u64> {
    if let Data::Int(i) = cell {
        return u64::try_from(*i).ok();
    }
    let value = cell_number(cell)?;
    // Stored as INTEGER, so it must also fit an i64.
    if value < 0.0 || value.fract() != 0.0 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value as u64)
}
