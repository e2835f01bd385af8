use std::fs;
use std::path::Path;

use log::debug;
use lopdf::Document;

use crate::core::error::{DrillError, Result};
use crate::parser::text_extractor::{PageText, PageTextSource};

pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).map_err(|err| DrillError::file_read(path.display().to_string(), err))?;
        Self::from_bytes(&bytes)
    }

    /// Fails only when the document as a whole cannot be loaded.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(bytes)
            .map_err(|err| DrillError::Extraction(format!("failed to load PDF: {err}")))?;

        if document.is_encrypted() && document.decrypt("").is_err() {
            return Err(DrillError::Extraction(
                "cannot decrypt password-protected PDF".to_string(),
            ));
        }

        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }
}

impl PageTextSource for PdfReader {
    fn page_texts(&self) -> Vec<PageText> {
        // get_pages is keyed by page number, so iteration is already in page order
        self.document
            .get_pages()
            .keys()
            .map(|&page_num| match self.document.extract_text(&[page_num]) {
                Ok(text) => PageText::from_extracted(text),
                Err(err) => {
                    debug!("page {page_num}: text extraction failed, treating as empty: {err}");
                    PageText::Empty
                }
            })
            .collect()
    }
}
