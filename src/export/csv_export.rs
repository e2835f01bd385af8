use std::path::PathBuf;

use crate::core::error::{DrillError, Result};
use crate::core::model::{ExportRow, EXPORT_HEADERS};
use crate::export::{ensure_parent, Exporter};

/// Same columns and headers as the spreadsheet export.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Exporter for CsvExporter {
    fn export(&self, rows: &[ExportRow]) -> Result<()> {
        ensure_parent(&self.path)?;
        let export_err = |err: csv::Error| DrillError::Export(err.to_string());

        let mut writer = csv::Writer::from_path(&self.path).map_err(export_err)?;
        writer.write_record(EXPORT_HEADERS).map_err(export_err)?;
        for row in rows {
            writer.write_record(row.cells()).map_err(export_err)?;
        }
        writer.flush()?;
        Ok(())
    }
}
