pub mod columns;
pub mod pdf_reader;
pub mod segmenter;
pub mod tabular;
pub mod text_extractor;

pub use columns::{infer_columns, ColumnMapping, ColumnOverrides, ColumnSelector};
pub use pdf_reader::PdfReader;
pub use segmenter::{segment, select_strategy, Segmentation, SegmenterConfig, Strategy};
pub use tabular::{read_table, TableFormat};
pub use text_extractor::{PageText, PageTextSource};
