//! Turns flat extracted lines into sentence records.
//!
//! Two strategies are tried in a fixed order. Delimited lines
//! (`han<TAB>pinyin<TAB>meaning`, `han | pinyin | meaning`, ...) are split
//! independently; when too few lines split cleanly the whole document is
//! instead read as consecutive `[han, pinyin, meaning]` line triples.

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::model::{RawDocumentText, SentenceRecord};

lazy_static! {
    static ref FIELD_DELIMITER: Regex =
        Regex::new(r"\t+| \| | - | – | — ").expect("delimiter pattern is valid");
}

pub const DEFAULT_FALLBACK_THRESHOLD: usize = 5;
pub const FIELDS_PER_RECORD: usize = 3;
const MEANING_JOINER: &str = " - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Delimited,
    FixedStride,
}

impl Strategy {
    pub fn describe(self) -> &'static str {
        match self {
            Strategy::Delimited => "delimiter split",
            Strategy::FixedStride => "fixed 3-line groups",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Minimum number of delimited lines for the delimiter split to be kept.
    pub fallback_threshold: usize,
    /// Drop a trailing group of 1-2 lines instead of padding it with empty fields.
    pub drop_incomplete_tail: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            drop_incomplete_tail: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub strategy: Strategy,
    pub records: Vec<SentenceRecord>,
}

impl Segmentation {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fields {
    han: String,
    pinyin: String,
    meaning: String,
}

pub fn select_strategy(delimited_count: usize, config: &SegmenterConfig) -> Strategy {
    if delimited_count >= config.fallback_threshold {
        Strategy::Delimited
    } else {
        Strategy::FixedStride
    }
}

pub fn segment(text: &RawDocumentText, config: &SegmenterConfig) -> Segmentation {
    let delimited = split_delimited(&text.lines);
    let strategy = select_strategy(delimited.len(), config);

    let fields = match strategy {
        Strategy::Delimited => delimited,
        Strategy::FixedStride => {
            debug!(
                "only {} delimited line(s) (threshold {}), regrouping {} lines by position",
                delimited.len(),
                config.fallback_threshold,
                text.len()
            );
            group_fixed_stride(&text.lines, config.drop_incomplete_tail)
        }
    };

    let records = assign_ordinals(fields);
    info!(
        "segmented {} line(s) into {} record(s) using {}",
        text.len(),
        records.len(),
        strategy.describe()
    );

    Segmentation { strategy, records }
}

/// Strategy A: keeps every line that splits into at least three fields.
fn split_delimited(lines: &[String]) -> Vec<Fields> {
    lines.iter().filter_map(|line| split_line(line)).collect()
}

fn split_line(line: &str) -> Option<Fields> {
    let parts: Vec<&str> = FIELD_DELIMITER
        .split(line)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() < FIELDS_PER_RECORD {
        return None;
    }

    Some(Fields {
        han: parts[0].to_string(),
        pinyin: parts[1].to_string(),
        meaning: parts[2..].join(MEANING_JOINER),
    })
}

/// Strategy B: reads lines as consecutive `[han, pinyin, meaning]` triples.
fn group_fixed_stride(lines: &[String], drop_incomplete_tail: bool) -> Vec<Fields> {
    lines
        .chunks(FIELDS_PER_RECORD)
        .filter(|group| !drop_incomplete_tail || group.len() == FIELDS_PER_RECORD)
        .map(|group| {
            let field = |i: usize| group.get(i).cloned().unwrap_or_default();
            Fields {
                han: field(0),
                pinyin: field(1),
                meaning: field(2),
            }
        })
        .collect()
}

fn assign_ordinals(fields: Vec<Fields>) -> Vec<SentenceRecord> {
    fields
        .into_iter()
        .enumerate()
        .map(|(idx, f)| SentenceRecord::new(idx + 1, f.han, f.pinyin, f.meaning))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(lines: &[&str]) -> RawDocumentText {
        RawDocumentText::from_lines(lines.iter().copied())
    }

    #[test]
    fn splits_on_every_delimiter_kind() {
        let cases = [
            "你好\tnǐ hǎo\tXin chào",
            "你好\t\t\tnǐ hǎo\tXin chào",
            "你好 | nǐ hǎo | Xin chào",
            "你好 - nǐ hǎo - Xin chào",
            "你好 – nǐ hǎo – Xin chào",
            "你好 — nǐ hǎo — Xin chào",
            "你好 | nǐ hǎo\tXin chào",
        ];
        for line in cases {
            let fields = split_line(line).unwrap_or_else(|| panic!("no split for {line:?}"));
            assert_eq!(fields.han, "你好");
            assert_eq!(fields.pinyin, "nǐ hǎo");
            assert_eq!(fields.meaning, "Xin chào");
        }
    }

    #[test]
    fn extra_parts_are_joined_into_meaning() {
        let fields = split_line("再见 | zàijiàn | Tạm biệt | hẹn gặp lại").unwrap();
        assert_eq!(fields.meaning, "Tạm biệt - hẹn gặp lại");
    }

    #[test]
    fn hyphen_without_spaces_is_not_a_delimiter() {
        assert!(split_line("一-二-三").is_none());
        assert!(split_line("你好 | nǐ hǎo").is_none());
    }

    #[test]
    fn empty_parts_do_not_count() {
        assert!(split_line("你好\t | \tXin chào").is_none());
    }

    #[test]
    fn threshold_decides_strategy() {
        let config = SegmenterConfig::default();
        assert_eq!(select_strategy(0, &config), Strategy::FixedStride);
        assert_eq!(select_strategy(4, &config), Strategy::FixedStride);
        assert_eq!(select_strategy(5, &config), Strategy::Delimited);

        let lenient = SegmenterConfig {
            fallback_threshold: 1,
            ..SegmenterConfig::default()
        };
        assert_eq!(select_strategy(1, &lenient), Strategy::Delimited);
    }

    #[test]
    fn fully_delimited_input_keeps_one_record_per_line() {
        let lines: Vec<String> = (0..6)
            .map(|i| format!("字{i}\tzì {i}\tchữ {i}\tnghĩa {i}"))
            .collect();
        let result = segment(&RawDocumentText::from_lines(&lines), &SegmenterConfig::default());

        assert_eq!(result.strategy, Strategy::Delimited);
        assert_eq!(result.records.len(), lines.len());
        for (i, record) in result.records.iter().enumerate() {
            assert_eq!(record.ordinal, i + 1);
            assert_eq!(record.han, format!("字{i}"));
            assert_eq!(record.pinyin, format!("zì {i}"));
            assert_eq!(record.meaning, format!("chữ {i} - nghĩa {i}"));
            assert_eq!(record.source_row, None);
        }
    }

    #[test]
    fn under_threshold_falls_back_to_triples_over_all_lines() {
        let mut lines = vec![
            "你好 | nǐ hǎo | Xin chào".to_string(),
            "谢谢 | xièxie | Cảm ơn".to_string(),
        ];
        lines.extend((1..=9).map(|i| format!("line {i}")));

        let result = segment(&RawDocumentText::from_lines(&lines), &SegmenterConfig::default());

        assert_eq!(result.strategy, Strategy::FixedStride);
        assert_eq!(result.records.len(), 3);
        assert_eq!(result.records[0].han, "你好 | nǐ hǎo | Xin chào");
        assert_eq!(result.records[0].pinyin, "谢谢 | xièxie | Cảm ơn");
        assert_eq!(result.records[0].meaning, "line 1");
        assert_eq!(result.records[2].han, "line 5");
        assert_eq!(result.records[2].meaning, "line 7");
        let ordinals: Vec<usize> = result.records.iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[test]
    fn empty_input_yields_no_records() {
        let result = segment(&RawDocumentText::default(), &SegmenterConfig::default());
        assert!(result.is_empty());
        assert_eq!(result.strategy, Strategy::FixedStride);
    }

    #[test]
    fn short_input_below_one_triple_yields_no_records() {
        let result = segment(&raw(&["你好", "nǐ hǎo"]), &SegmenterConfig::default());
        assert!(result.is_empty());
    }

    #[test]
    fn incomplete_tail_can_be_kept() {
        let config = SegmenterConfig {
            drop_incomplete_tail: false,
            ..SegmenterConfig::default()
        };
        let result = segment(&raw(&["你好", "nǐ hǎo", "Xin chào", "谢谢"]), &config);

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[1].han, "谢谢");
        assert_eq!(result.records[1].pinyin, "");
        assert_eq!(result.records[1].meaning, "");
    }

    #[test]
    fn delimited_output_drops_non_matching_lines_and_renumbers() {
        let mut lines: Vec<String> = (0..5).map(|i| format!("字{i} | zì | chữ")).collect();
        lines.insert(2, "Bài 1".to_string());
        let result = segment(&RawDocumentText::from_lines(&lines), &SegmenterConfig::default());

        assert_eq!(result.strategy, Strategy::Delimited);
        assert_eq!(result.records.len(), 5);
        assert_eq!(result.records[2].han, "字2");
        assert_eq!(result.records[2].ordinal, 3);
    }
}
