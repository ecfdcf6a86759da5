//! Scanned-document detection.

use crate::error::Result;

use super::backend::PageSource;

/// Decide whether a document is scanned.
///
/// A document is scanned iff every page yields empty extractable text after
/// whitespace trimming; a single page with real text forces the digital
/// path for the whole document. A zero-page document counts as scanned.
///
/// Pages whose text extraction fails are treated as empty: an unreadable
/// content stream carries the same signal as an absent one.
pub fn is_scanned<S: PageSource>(source: &S) -> Result<bool> {
    for page in source.pages() {
        let text = source.page_text(page).unwrap_or_default();
        if !text.trim().is_empty() {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::backend::Span;
    use crate::error::Error;

    struct FakeSource {
        pages: Vec<String>,
    }

    impl PageSource for FakeSource {
        fn pages(&self) -> Vec<u32> {
            (1..=self.pages.len() as u32).collect()
        }

        fn page_text(&self, page: u32) -> Result<String> {
            self.pages
                .get((page - 1) as usize)
                .cloned()
                .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
        }

        fn page_spans(&self, _page: u32) -> Result<Vec<Span>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_all_empty_pages_is_scanned() {
        let source = FakeSource {
            pages: vec!["".to_string(), "  \n\t ".to_string()],
        };
        assert!(is_scanned(&source).unwrap());
    }

    #[test]
    fn test_single_text_page_forces_digital() {
        let source = FakeSource {
            pages: vec!["".to_string(), "Chapter 1".to_string(), "".to_string()],
        };
        assert!(!is_scanned(&source).unwrap());
    }

    #[test]
    fn test_zero_pages_is_scanned() {
        let source = FakeSource { pages: vec![] };
        assert!(is_scanned(&source).unwrap());
    }
}
