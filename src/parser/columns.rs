use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::core::error::{DrillError, Result};
use crate::core::model::{SentenceRecord, Table};

const HAN_KEYS: &[&str] = &["han", "hán", "chinese", "hanzi"];
const PINYIN_KEYS: &[&str] = &["pinyin"];
const MEANING_KEYS: &[&str] = &["viet", "việt", "nghia", "nghĩa", "vietname"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub han: usize,
    pub pinyin: usize,
    pub meaning: usize,
}

/// Operator override for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSelector {
    Name(String),
    Index(usize),
}

impl ColumnSelector {
    /// An exact header name wins; otherwise a bare number is a 0-based index.
    pub fn resolve(&self, headers: &[String]) -> Option<usize> {
        match self {
            ColumnSelector::Index(idx) => (*idx < headers.len()).then_some(*idx),
            ColumnSelector::Name(name) => headers
                .iter()
                .position(|h| h == name)
                .or_else(|| name.parse::<usize>().ok().filter(|idx| *idx < headers.len())),
        }
    }
}

impl std::fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnSelector::Name(name) => write!(f, "\"{name}\""),
            ColumnSelector::Index(idx) => write!(f, "#{idx}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOverrides {
    pub han: Option<ColumnSelector>,
    pub pinyin: Option<ColumnSelector>,
    pub meaning: Option<ColumnSelector>,
}

pub fn infer_columns(headers: &[String]) -> ColumnMapping {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.nfc().collect::<String>().to_lowercase())
        .collect();

    ColumnMapping {
        han: find_header(&normalized, HAN_KEYS).unwrap_or_else(|| positional(0, headers.len())),
        pinyin: find_header(&normalized, PINYIN_KEYS)
            .unwrap_or_else(|| positional(1, headers.len())),
        meaning: find_header(&normalized, MEANING_KEYS)
            .unwrap_or_else(|| positional(2, headers.len())),
    }
}

fn find_header(headers: &[String], keys: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|header| keys.iter().any(|key| header.contains(key)))
}

fn positional(default: usize, column_count: usize) -> usize {
    default.min(column_count.saturating_sub(1))
}

pub fn resolve_columns(
    table: &Table,
    overrides: &ColumnOverrides,
    name: &str,
) -> Result<ColumnMapping> {
    let inferred = infer_columns(&table.headers);
    let pick = |selector: &Option<ColumnSelector>, fallback: usize| match selector {
        None => Ok(fallback),
        Some(sel) => sel
            .resolve(&table.headers)
            .ok_or_else(|| DrillError::file_read(name, format!("column {sel} not found"))),
    };

    Ok(ColumnMapping {
        han: pick(&overrides.han, inferred.han)?,
        pinyin: pick(&overrides.pinyin, inferred.pinyin)?,
        meaning: pick(&overrides.meaning, inferred.meaning)?,
    })
}

/// Every data row becomes a record; ordinal and source row are both `row + 1`.
pub fn table_to_records(table: &Table, mapping: &ColumnMapping) -> Vec<SentenceRecord> {
    (0..table.row_count())
        .map(|row| {
            SentenceRecord::new(
                row + 1,
                table.cell(row, mapping.han).trim(),
                table.cell(row, mapping.pinyin).trim(),
                table.cell(row, mapping.meaning).trim(),
            )
            .with_source_row(row + 1)
        })
        .collect()
}
