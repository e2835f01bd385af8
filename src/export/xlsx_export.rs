use std::fs;
use std::path::PathBuf;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::core::error::{DrillError, Result};
use crate::core::model::{ExportRow, EXPORT_HEADERS};
use crate::export::{ensure_parent, Exporter};

pub const SHEET_NAME: &str = "Ket_qua_hoc";

const COLUMN_WIDTHS: [f64; 6] = [10.0, 40.0, 30.0, 30.0, 14.0, 22.0];

#[derive(Debug, Clone)]
pub struct XlsxExporter {
    path: PathBuf,
}

impl XlsxExporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Exporter for XlsxExporter {
    fn export(&self, rows: &[ExportRow]) -> Result<()> {
        ensure_parent(&self.path)?;
        let bytes = to_xlsx_bytes(rows)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

/// Serializes the rows as a single-sheet workbook.
pub fn to_xlsx_bytes(rows: &[ExportRow]) -> Result<Vec<u8>> {
    build_workbook(rows).map_err(|err| DrillError::Export(err.to_string()))
}

fn build_workbook(rows: &[ExportRow]) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, (title, width)) in EXPORT_HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, width)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_number(r, 0, row.ordinal as f64)?;
        sheet.write_string(r, 1, &row.meaning)?;
        sheet.write_string(r, 2, &row.han)?;
        sheet.write_string(r, 3, &row.pinyin)?;
        sheet.write_string(r, 4, row.verdict.label())?;
        if let Some(source_row) = row.source_row {
            sheet.write_number(r, 5, source_row as f64)?;
        }
    }

    workbook.save_to_buffer()
}
