use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Trimmed, non-blank lines of extracted document text in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocumentText {
    pub lines: Vec<String>,
}

impl RawDocumentText {
    /// Splits on line breaks, trims each line and drops the blank ones.
    ///
    /// Lines are NFC-normalized so that decomposed Vietnamese diacritics coming
    /// out of PDF text extraction compare equal to their precomposed forms.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.nfc().collect::<String>())
            .collect();
        Self { lines }
    }

    /// Same trimming and normalization as `from_text`, one entry per line.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .map(|line| line.as_ref().trim().nfc().collect::<String>())
            .filter(|line| !line.is_empty())
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// 1-based position in the processed sequence.
    pub ordinal: usize,
    pub han: String,
    pub pinyin: String,
    pub meaning: String,
    /// 1-based data row in the source file; only known for tabular sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_row: Option<usize>,
}

impl SentenceRecord {
    pub fn new(
        ordinal: usize,
        han: impl Into<String>,
        pinyin: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            ordinal,
            han: han.into(),
            pinyin: pinyin.into(),
            meaning: meaning.into(),
            source_row: None,
        }
    }

    pub fn with_source_row(mut self, row: usize) -> Self {
        self.source_row = Some(row);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
    #[default]
    Unmarked,
}

impl Verdict {
    /// Cell text used in exported tables.
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Correct => "Đúng",
            Verdict::Incorrect => "Sai",
            Verdict::Unmarked => "",
        }
    }

    /// Text shown on the study card.
    pub fn display_label(self) -> &'static str {
        match self {
            Verdict::Unmarked => "Chưa đánh dấu",
            other => other.label(),
        }
    }
}

/// A verdict the learner can actually record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Correct,
    Incorrect,
}

impl From<Mark> for Verdict {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Correct => Verdict::Correct,
            Mark::Incorrect => Verdict::Incorrect,
        }
    }
}

/// Header row plus data rows of a CSV or Excel sheet, all cells as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Column headers of the exported result sheet, in their fixed order.
pub const EXPORT_HEADERS: [&str; 6] = [
    "Số thứ tự",
    "Nghĩa tiếng Việt",
    "Hán tự",
    "Pinyin",
    "Check kết quả",
    "Số thứ tự câu trong file",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub ordinal: usize,
    pub meaning: String,
    pub han: String,
    pub pinyin: String,
    pub verdict: Verdict,
    pub source_row: Option<usize>,
}

impl ExportRow {
    pub fn from_record(record: &SentenceRecord, verdict: Verdict) -> Self {
        Self {
            ordinal: record.ordinal,
            meaning: record.meaning.clone(),
            han: record.han.clone(),
            pinyin: record.pinyin.clone(),
            verdict,
            source_row: record.source_row,
        }
    }

    /// Cells in `EXPORT_HEADERS` order.
    pub fn cells(&self) -> [String; 6] {
        [
            self.ordinal.to_string(),
            self.meaning.clone(),
            self.han.clone(),
            self.pinyin.clone(),
            self.verdict.label().to_string(),
            self.source_row.map(|row| row.to_string()).unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_text_drops_blank_lines_and_trims() {
        let raw = RawDocumentText::from_text("  你好 \n\n\t \nnǐ hǎo\r\nXin chào  \n");
        assert_eq!(raw.lines, vec!["你好", "nǐ hǎo", "Xin chào"]);
    }

    #[test]
    fn raw_text_composes_decomposed_diacritics() {
        // "Việt" with combining dot below and circumflex
        let raw = RawDocumentText::from_text("Vie\u{0302}\u{0323}t");
        assert_eq!(raw.lines, vec!["Việt"]);
    }

    #[test]
    fn both_constructors_normalize_alike() {
        let decomposed = "  Vie\u{0302}\u{0323}t  ";
        let from_lines = RawDocumentText::from_lines([decomposed, " ", "nǐ hǎo"]);
        assert_eq!(from_lines.lines, vec!["Việt", "nǐ hǎo"]);
        assert_eq!(from_lines, RawDocumentText::from_text(&format!("{decomposed}\n\nnǐ hǎo")));
    }

    #[test]
    fn export_cells_follow_header_order() {
        let record = SentenceRecord::new(3, "谢谢", "xièxie", "Cảm ơn").with_source_row(7);
        let row = ExportRow::from_record(&record, Verdict::Incorrect);
        assert_eq!(row.cells(), ["3", "Cảm ơn", "谢谢", "xièxie", "Sai", "7"]);
    }

    #[test]
    fn unmarked_exports_as_empty_cell() {
        let record = SentenceRecord::new(1, "你好", "nǐ hǎo", "Xin chào");
        let row = ExportRow::from_record(&record, Verdict::default());
        assert_eq!(row.cells()[4], "");
        assert_eq!(row.cells()[5], "");
        assert_eq!(Verdict::Unmarked.display_label(), "Chưa đánh dấu");
    }
}
