use std::fs;
use std::path::PathBuf;

use crate::core::error::{DrillError, Result};
use crate::core::model::ExportRow;
use crate::export::{ensure_parent, Exporter};

#[derive(Debug, Clone)]
pub struct JsonExporter {
    path: PathBuf,
}

impl JsonExporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, rows: &[ExportRow]) -> Result<()> {
        ensure_parent(&self.path)?;
        let data =
            serde_json::to_string_pretty(rows).map_err(|err| DrillError::Export(err.to_string()))?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
