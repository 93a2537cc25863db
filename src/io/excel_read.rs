use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::{FoilError, Result};
use crate::report::{REPORT_COLUMNS, ReportRow, ReportSheet};

/// Reads a report produced by [`excel_write`](crate::io::excel_write) back
/// into sheets, in workbook order.
///
/// The alpha of each sheet is recovered from its title and is therefore the
/// truncated value shown to the user.
pub fn read_report(path: &Path) -> Result<Vec<ReportSheet>> {
    if !path.exists() {
        return Err(FoilError::MissingInput(path.to_path_buf()));
    }
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let names = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .ok_or_else(|| FoilError::InvalidWorkbook(format!("missing sheet '{name}'")))??;
        sheets.push(read_sheet(&name, &range)?);
    }
    Ok(sheets)
}

fn read_sheet(name: &str, range: &calamine::Range<DataType>) -> Result<ReportSheet> {
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|cell| cell_to_string(Some(cell))).collect())
        .unwrap_or_default();
    if headers.len() < REPORT_COLUMNS.len()
        || headers
            .iter()
            .zip(REPORT_COLUMNS)
            .any(|(found, expected)| found != expected)
    {
        return Err(FoilError::InvalidWorkbook(format!(
            "sheet '{name}' does not start with the report header"
        )));
    }

    let mut report_rows = Vec::new();
    for row in rows {
        let airfoil = cell_to_string(row.first());
        if airfoil.is_empty() {
            continue;
        }

        let mut values = [None; 8];
        for (slot, cell) in values.iter_mut().zip(row.iter().skip(1)) {
            *slot = cell_to_number(name, cell)?;
        }
        let number = |index: usize| values[index].unwrap_or(f64::NAN);

        report_rows.push(ReportRow {
            airfoil,
            lift: number(0),
            drag: number(1),
            pressure_drag: number(2),
            lift_to_drag: values[3],
            moment: number(4),
            min_pressure: number(5),
            top_transition: number(6),
            bottom_transition: number(7),
        });
    }

    Ok(ReportSheet {
        title: name.to_string(),
        alpha: title_alpha(name),
        rows: report_rows,
    })
}

/// Parses the degree label of `Alpha(deg)=<n>` titles, ignoring any
/// de-duplication suffix.
fn title_alpha(title: &str) -> f64 {
    title
        .strip_prefix("Alpha(deg)=")
        .map(|rest| rest.split('_').next().unwrap_or(rest))
        .and_then(|label| label.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

fn cell_to_number(sheet: &str, cell: &DataType) -> Result<Option<f64>> {
    match cell {
        DataType::Float(value) => Ok(Some(*value)),
        DataType::Int(value) => Ok(Some(*value as f64)),
        DataType::Empty => Ok(None),
        DataType::String(value) if value.trim().is_empty() => Ok(None),
        other => Err(FoilError::InvalidWorkbook(format!(
            "non-numeric cell '{other}' in sheet '{sheet}'"
        ))),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
