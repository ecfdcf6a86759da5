//! Document title recovery from first-page leading lines.

use crate::model::outline::FALLBACK_TITLE_NO_LINES;

/// Lines shorter than this (trimmed) are noise, not title material.
const MIN_TITLE_LINE: usize = 7;
/// Digital-path upper bound on a title line.
const MAX_TITLE_LINE_DIGITAL: usize = 99;
/// OCR-path upper bound; OCR lines run longer before becoming body text.
const MAX_TITLE_LINE_OCR: usize = 119;
/// At most this many leading lines are joined into the title.
const MAX_TITLE_LINES: usize = 3;

/// Build a title from the first page's text.
///
/// Takes the first few lines whose trimmed length sits inside the title
/// band and joins them with single spaces. When no line qualifies the
/// document gets the placeholder title.
pub fn title_from_first_page(first_page_text: &str, ocr: bool) -> String {
    let max_len = if ocr {
        MAX_TITLE_LINE_OCR
    } else {
        MAX_TITLE_LINE_DIGITAL
    };

    let lines: Vec<&str> = first_page_text
        .lines()
        .map(str::trim)
        .filter(|line| {
            let len = line.chars().count();
            len >= MIN_TITLE_LINE && len <= max_len
        })
        .take(MAX_TITLE_LINES)
        .collect();

    if lines.is_empty() {
        FALLBACK_TITLE_NO_LINES.to_string()
    } else {
        lines.join(" ")
    }
}
