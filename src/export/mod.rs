pub mod csv_export;
pub mod json_export;
pub mod xlsx_export;

use std::path::Path;

use crate::core::error::{DrillError, Result};
use crate::core::model::ExportRow;

pub use csv_export::CsvExporter;
pub use json_export::JsonExporter;
pub use xlsx_export::XlsxExporter;

pub const DEFAULT_EXPORT_FILE: &str = "ket_qua_hoc_tieng_trung.xlsx";

pub trait Exporter {
    fn export(&self, rows: &[ExportRow]) -> Result<()>;
}

/// Picks the exporter from the output file extension.
pub fn exporter_for(path: &Path) -> Result<Box<dyn Exporter>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let path = path.to_path_buf();
    match ext.as_str() {
        "xlsx" => Ok(Box::new(XlsxExporter::new(path))),
        "csv" => Ok(Box::new(CsvExporter::new(path))),
        "json" => Ok(Box::new(JsonExporter::new(path))),
        other => Err(DrillError::UnsupportedFormat(format!(
            "cannot export to .{other} (use .xlsx, .csv or .json)"
        ))),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
