use log::warn;

use crate::core::model::RawDocumentText;

/// Outcome of extracting one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageText {
    Text(String),
    Empty,
}

impl PageText {
    pub fn from_extracted(text: String) -> Self {
        if text.trim().is_empty() {
            PageText::Empty
        } else {
            PageText::Text(text)
        }
    }
}

pub trait PageTextSource {
    /// One entry per page, in page order. Never fails per page.
    fn page_texts(&self) -> Vec<PageText>;
}

pub fn concat_pages(pages: &[PageText]) -> String {
    pages
        .iter()
        .filter_map(|page| match page {
            PageText::Text(text) => Some(text.as_str()),
            PageText::Empty => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn extract_lines<S: PageTextSource + ?Sized>(source: &S) -> RawDocumentText {
    let pages = source.page_texts();
    let text = concat_pages(&pages);
    if text.is_empty() && !pages.is_empty() {
        warn!(
            "none of the {} page(s) yielded text, the PDF may be scanned",
            pages.len()
        );
    }
    RawDocumentText::from_text(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPages(Vec<PageText>);

    impl PageTextSource for FixedPages {
        fn page_texts(&self) -> Vec<PageText> {
            self.0.clone()
        }
    }

    #[test]
    fn empty_pages_contribute_nothing() {
        let pages = vec![
            PageText::Text("你好\nnǐ hǎo".to_string()),
            PageText::Empty,
            PageText::Text("Xin chào".to_string()),
        ];
        assert_eq!(concat_pages(&pages), "你好\nnǐ hǎo\nXin chào");
    }

    #[test]
    fn whitespace_only_extraction_counts_as_empty() {
        assert_eq!(PageText::from_extracted(" \n\t".to_string()), PageText::Empty);
        assert_eq!(
            PageText::from_extracted("谢谢".to_string()),
            PageText::Text("谢谢".to_string())
        );
    }

    #[test]
    fn extract_lines_preserves_page_order() {
        let source = FixedPages(vec![
            PageText::Empty,
            PageText::Text("一\n\n二".to_string()),
            PageText::Text("  三  ".to_string()),
        ]);
        let raw = extract_lines(&source);
        assert_eq!(raw.lines, vec!["一", "二", "三"]);
    }

    #[test]
    fn all_empty_pages_give_empty_text() {
        let source = FixedPages(vec![PageText::Empty, PageText::Empty]);
        assert!(extract_lines(&source).is_empty());
    }
}
