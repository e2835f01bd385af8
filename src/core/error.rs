use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrillError {
    #[error("failed to read {path}: {reason}")]
    FileRead { path: String, reason: String },

    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF could not be opened: {0}")]
    Extraction(String),

    #[error("no sentences loaded")]
    EmptyDataset,

    #[error("row {index} is out of range (dataset has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("sentence {ordinal} does not exist (numbers run from 1 to {len})")]
    NoSuchSentence { ordinal: usize, len: usize },

    #[error("export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DrillError {
    pub fn file_read(path: impl Into<String>, reason: impl ToString) -> Self {
        DrillError::FileRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DrillError>;
