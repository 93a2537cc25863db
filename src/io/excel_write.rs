use std::fs;
use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Format, Table, TableColumn, Workbook};
use tracing::debug;

use crate::error::{FoilError, Result};
use crate::report::{REPORT_COLUMNS, ReportSheet};

/// Renders the report sheets into an in-memory `.xlsx` document.
pub fn render_report(sheets: &[ReportSheet]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let number_format = Format::new().set_num_format("0.00000");

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.title)?;

        for (col_idx, header) in REPORT_COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, *header, &header_format)?;
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let excel_row = (row_idx + 1) as u32;
            worksheet.write_string(excel_row, 0, &row.airfoil)?;
            for (offset, value) in row.values().iter().enumerate() {
                // Undefined values such as L/D at zero drag stay blank.
                if let Some(value) = value {
                    worksheet.write_number_with_format(
                        excel_row,
                        (offset + 1) as u16,
                        *value,
                        &number_format,
                    )?;
                }
            }
        }

        let columns: Vec<TableColumn> = REPORT_COLUMNS
            .iter()
            .map(|header| TableColumn::new().set_header(*header))
            .collect();
        let mut excel_table = Table::new();
        excel_table.set_autofilter(true).set_columns(&columns);

        let col_end = (REPORT_COLUMNS.len() as u16).saturating_sub(1);
        let row_end = sheet.rows.len().max(1) as u32;
        worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;
        worksheet.set_column_width(0, 16)?;
        worksheet.set_freeze_panes(1, 1)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Writes the report to `path`, replacing any existing file.
///
/// The document is rendered in memory, written to a temporary file next to
/// the destination and renamed over it, so `path` either keeps its previous
/// contents or holds the complete new report.
pub fn write_report(path: &Path, sheets: &[ReportSheet]) -> Result<()> {
    let bytes = render_report(sheets)?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !directory.is_dir() {
        fs::create_dir_all(directory)?;
    }

    let mut staging = tempfile::Builder::new()
        .prefix(".quickfoil-")
        .suffix(".xlsx.tmp")
        .tempfile_in(directory)?;
    staging.write_all(&bytes)?;
    staging.as_file().sync_all()?;
    debug!(bytes = bytes.len(), staging = %staging.path().display(), "report staged");

    staging.persist(path).map_err(|error| FoilError::Export {
        path: path.to_path_buf(),
        source: error.error,
    })?;
    Ok(())
}
