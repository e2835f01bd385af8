pub mod console;

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{DrillError, Result};
use crate::core::model::{ExportRow, Mark, SentenceRecord, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyOrder {
    #[default]
    Sequential,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Meaning,
    Han,
    Pinyin,
}

/// Which fields of the current card are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealSettings {
    pub meaning: bool,
    pub han: bool,
    pub pinyin: bool,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            meaning: true,
            han: false,
            pinyin: false,
        }
    }
}

impl RevealSettings {
    pub fn all() -> Self {
        Self {
            meaning: true,
            han: true,
            pinyin: true,
        }
    }

    pub fn toggle(&mut self, field: Field) {
        match field {
            Field::Meaning => self.meaning = !self.meaning,
            Field::Han => self.han = !self.han,
            Field::Pinyin => self.pinyin = !self.pinyin,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub correct: usize,
    pub incorrect: usize,
    pub unmarked: usize,
}

/// Cursor and annotations for one loaded document.
#[derive(Debug, Clone)]
pub struct StudySession {
    records: Vec<SentenceRecord>,
    cursor: usize,
    annotations: BTreeMap<usize, Verdict>,
    pub order: StudyOrder,
    pub reveal: RevealSettings,
}

impl StudySession {
    pub fn new(records: Vec<SentenceRecord>) -> Self {
        Self {
            records,
            cursor: 0,
            annotations: BTreeMap::new(),
            order: StudyOrder::default(),
            reveal: RevealSettings::default(),
        }
    }

    pub fn with_order(mut self, order: StudyOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_reveal(mut self, reveal: RevealSettings) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn records(&self) -> &[SentenceRecord] {
        &self.records
    }

    pub fn current(&self) -> Result<&SentenceRecord> {
        self.records.get(self.cursor).ok_or(DrillError::EmptyDataset)
    }

    /// Moves one row, staying put at either end.
    pub fn advance(&mut self, direction: Direction) -> usize {
        let last = self.records.len().saturating_sub(1);
        self.cursor = match direction {
            Direction::Prev => self.cursor.saturating_sub(1),
            Direction::Next => (self.cursor + 1).min(last),
        };
        self.cursor
    }

    /// Jumps to the row with the given 1-based ordinal.
    pub fn go_to(&mut self, ordinal: usize) -> Result<usize> {
        if ordinal == 0 || ordinal > self.records.len() {
            return Err(DrillError::NoSuchSentence {
                ordinal,
                len: self.records.len(),
            });
        }
        self.cursor = ordinal - 1;
        Ok(self.cursor)
    }

    pub fn jump_random(&mut self) -> Result<usize> {
        self.jump_random_with(&mut rand::thread_rng())
    }

    pub fn jump_random_with<R: Rng>(&mut self, rng: &mut R) -> Result<usize> {
        if self.records.is_empty() {
            return Err(DrillError::EmptyDataset);
        }
        self.cursor = rng.gen_range(0..self.records.len());
        Ok(self.cursor)
    }

    /// Records a verdict for any row, not only the current one.
    pub fn mark(&mut self, index: usize, mark: Mark) -> Result<()> {
        if index >= self.records.len() {
            return Err(DrillError::RowOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        self.annotations.insert(index, mark.into());
        Ok(())
    }

    pub fn mark_current(&mut self, mark: Mark) -> Result<()> {
        if self.records.is_empty() {
            return Err(DrillError::EmptyDataset);
        }
        self.mark(self.cursor, mark)
    }

    pub fn verdict(&self, index: usize) -> Verdict {
        self.annotations.get(&index).copied().unwrap_or_default()
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            unmarked: self.records.len(),
            ..Summary::default()
        };
        for verdict in self.annotations.values() {
            match verdict {
                Verdict::Correct => summary.correct += 1,
                Verdict::Incorrect => summary.incorrect += 1,
                Verdict::Unmarked => continue,
            }
            summary.unmarked -= 1;
        }
        summary
    }

    pub fn export(&self) -> Vec<ExportRow> {
        self.records
            .iter()
            .enumerate()
            .map(|(idx, record)| ExportRow::from_record(record, self.verdict(idx)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(n: usize) -> StudySession {
        let records = (1..=n)
            .map(|i| SentenceRecord::new(i, format!("字{i}"), format!("zì{i}"), format!("chữ {i}")))
            .collect();
        StudySession::new(records)
    }

    #[test]
    fn advance_is_clamped_at_both_ends() {
        let mut s = session(3);
        assert_eq!(s.advance(Direction::Prev), 0);
        assert_eq!(s.advance(Direction::Next), 1);
        assert_eq!(s.advance(Direction::Next), 2);
        assert_eq!(s.advance(Direction::Next), 2);
        assert_eq!(s.advance(Direction::Prev), 1);
    }

    #[test]
    fn advance_on_empty_session_stays_at_zero() {
        let mut s = session(0);
        assert_eq!(s.advance(Direction::Next), 0);
        assert!(matches!(s.current(), Err(DrillError::EmptyDataset)));
    }

    #[test]
    fn random_jump_stays_in_range() {
        let mut s = session(4);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let idx = s.jump_random_with(&mut rng).unwrap();
            assert!(idx < 4);
            assert_eq!(s.cursor(), idx);
        }
    }

    #[test]
    fn random_jump_on_empty_dataset_fails() {
        let mut s = session(0);
        assert!(matches!(s.jump_random(), Err(DrillError::EmptyDataset)));
    }

    #[test]
    fn export_joins_marks_with_unmarked_default() {
        let mut s = session(5);
        s.mark(2, Mark::Correct).unwrap();
        let rows = s.export();

        assert_eq!(rows.len(), 5);
        for (idx, row) in rows.iter().enumerate() {
            let expected = if idx == 2 { Verdict::Correct } else { Verdict::Unmarked };
            assert_eq!(row.verdict, expected);
            assert_eq!(row.ordinal, idx + 1);
        }
    }

    #[test]
    fn marking_overwrites_and_need_not_be_current() {
        let mut s = session(3);
        s.mark(1, Mark::Correct).unwrap();
        s.mark(1, Mark::Incorrect).unwrap();
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.verdict(1), Verdict::Incorrect);

        let err = s.mark(3, Mark::Correct).unwrap_err();
        assert!(matches!(err, DrillError::RowOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn summary_counts_each_verdict() {
        let mut s = session(4);
        s.mark_current(Mark::Correct).unwrap();
        s.advance(Direction::Next);
        s.mark_current(Mark::Incorrect).unwrap();
        s.mark(3, Mark::Correct).unwrap();

        assert_eq!(
            s.summary(),
            Summary {
                correct: 2,
                incorrect: 1,
                unmarked: 1,
            }
        );
    }

    #[test]
    fn go_to_uses_ordinals() {
        let mut s = session(3);
        assert_eq!(s.go_to(3).unwrap(), 2);
        assert!(matches!(
            s.go_to(0),
            Err(DrillError::NoSuchSentence { ordinal: 0, len: 3 })
        ));
        assert!(matches!(
            s.go_to(4),
            Err(DrillError::NoSuchSentence { ordinal: 4, len: 3 })
        ));
        assert_eq!(s.cursor(), 2);
    }

    #[test]
    fn reveal_toggles_fields() {
        let mut reveal = RevealSettings::default();
        reveal.toggle(Field::Han);
        reveal.toggle(Field::Meaning);
        assert_eq!(
            reveal,
            RevealSettings {
                meaning: false,
                han: true,
                pinyin: false,
            }
        );
    }
}
