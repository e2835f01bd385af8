pub mod core;
pub mod export;
pub mod parser;
pub mod pipeline;
pub mod session;

pub use crate::core::error::{DrillError, Result};
pub use crate::core::model::{ExportRow, Mark, RawDocumentText, SentenceRecord, Verdict};
pub use session::StudySession;
