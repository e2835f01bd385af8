use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::core::error::DrillError;
use crate::core::model::{ExportRow, SentenceRecord};
use crate::export::exporter_for;
use crate::parser::columns::{resolve_columns, table_to_records};
use crate::parser::text_extractor::extract_lines;
use crate::parser::{
    read_table, segment, ColumnMapping, ColumnOverrides, PdfReader, SegmenterConfig, Strategy,
    TableFormat,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Choose by file extension.
    #[default]
    Auto,
    Table,
    Pdf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub mode: ParseMode,
    #[serde(default)]
    pub columns: ColumnOverrides,
    #[serde(default)]
    pub segmenter: SegmenterConfig,
}

impl PipelineConfig {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            mode: ParseMode::default(),
            columns: ColumnOverrides::default(),
            segmenter: SegmenterConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Origin {
    Table {
        headers: Vec<String>,
        columns: ColumnMapping,
    },
    Pdf {
        pages: usize,
        lines: usize,
        strategy: Strategy,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadedDocument {
    pub name: String,
    pub origin: Origin,
    pub records: Vec<SentenceRecord>,
}

enum SourceKind {
    Table(TableFormat),
    Pdf,
}

fn source_kind(name: &str, mode: ParseMode) -> crate::Result<SourceKind> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match mode {
        ParseMode::Pdf => Ok(SourceKind::Pdf),
        // anything that is not a workbook is read as delimited text
        ParseMode::Table => Ok(SourceKind::Table(
            TableFormat::from_extension(&ext).unwrap_or(TableFormat::Csv),
        )),
        ParseMode::Auto if ext == "pdf" => Ok(SourceKind::Pdf),
        ParseMode::Auto => TableFormat::from_extension(&ext)
            .map(SourceKind::Table)
            .ok_or_else(|| {
                DrillError::UnsupportedFormat(format!(
                    "{name}: expected .csv, .xlsx, .xls or .pdf"
                ))
            }),
    }
}

/// Builds the record sequence for one document. Nothing is kept on failure.
pub fn load_bytes(
    bytes: &[u8],
    name: &str,
    config: &PipelineConfig,
) -> crate::Result<LoadedDocument> {
    let document = match source_kind(name, config.mode)? {
        SourceKind::Table(format) => {
            let table = read_table(bytes, format, name)?;
            let columns = resolve_columns(&table, &config.columns, name)?;
            let records = table_to_records(&table, &columns);
            LoadedDocument {
                name: name.to_string(),
                origin: Origin::Table {
                    headers: table.headers,
                    columns,
                },
                records,
            }
        }
        SourceKind::Pdf => {
            let reader = PdfReader::from_bytes(bytes)?;
            let lines = extract_lines(&reader);
            let segmentation = segment(&lines, &config.segmenter);
            LoadedDocument {
                name: name.to_string(),
                origin: Origin::Pdf {
                    pages: reader.page_count(),
                    lines: lines.len(),
                    strategy: segmentation.strategy,
                },
                records: segmentation.records,
            }
        }
    };

    info!("{name}: loaded {} sentence(s)", document.records.len());
    Ok(document)
}

pub fn load_document(config: &PipelineConfig) -> Result<LoadedDocument> {
    let name = config
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.input.display().to_string());

    let bytes = fs::read(&config.input)
        .with_context(|| format!("Failed to read {}", config.input.display()))?;

    load_bytes(&bytes, &name, config)
        .with_context(|| format!("Failed to load sentences from {}", config.input.display()))
}

pub fn export_rows(rows: &[ExportRow], output: &Path) -> Result<()> {
    let exporter = exporter_for(output)?;
    exporter
        .export(rows)
        .with_context(|| format!("Failed to export to {}", output.display()))?;
    info!("exported {} row(s) to {}", rows.len(), output.display());
    Ok(())
}
