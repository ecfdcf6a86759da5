//! Digital-path block extraction.
//!
//! Walks a page's spans, groups them into baselines, and emits one
//! [`TextBlock`] per line using the line's first span as representative.

use crate::error::Result;
use crate::model::TextBlock;

use super::backend::{PageSource, Span};

/// Maximum word count for a line to be considered block-sized.
///
/// Longer runs are paragraph text and are rejected early, before the
/// heading filter ever sees them.
pub const MAX_BLOCK_WORDS: usize = 14;

/// Extract text blocks from every page of a document, in page order.
///
/// Pages whose span extraction fails are skipped with a warning; a broken
/// content stream on one page never fails the document.
pub fn extract_blocks<S: PageSource>(source: &S) -> Vec<TextBlock> {
    let mut blocks = Vec::new();
    for page in source.pages() {
        match page_blocks(source, page) {
            Ok(mut page_blocks) => blocks.append(&mut page_blocks),
            Err(e) => log::warn!("Skipping page {}: {}", page, e),
        }
    }
    blocks
}

/// Extract text blocks from a single page.
pub fn page_blocks<S: PageSource>(source: &S, page: u32) -> Result<Vec<TextBlock>> {
    let spans = source.page_spans(page)?;
    let lines = group_into_lines(spans);

    let mut blocks = Vec::new();
    for line in lines {
        // The first (leftmost) span stands in for the line; multi-span
        // lines do not get merged text.
        let rep = match line.first() {
            Some(span) => span,
            None => continue,
        };

        let text = rep.text.trim();
        if text.is_empty() {
            continue;
        }
        if text.split_whitespace().count() > MAX_BLOCK_WORDS {
            continue;
        }

        blocks.push(TextBlock::digital(text, page, rep.font_size, rep.is_bold));
    }

    Ok(blocks)
}

/// Group spans into baselines: top-to-bottom lines, left-to-right spans.
///
/// Spans whose baselines differ by less than half the larger font size are
/// treated as one line (superscripts and slightly jittered baselines land
/// on their host line).
fn group_into_lines(mut spans: Vec<Span>) -> Vec<Vec<Span>> {
    if spans.is_empty() {
        return Vec::new();
    }

    // PDF y grows upward, so descending y is top-to-bottom reading order.
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<Vec<Span>> = Vec::new();
    for span in spans {
        let same_line = lines.last().is_some_and(|line| {
            let anchor = &line[0];
            let tolerance = anchor.font_size.max(span.font_size) * 0.5;
            (anchor.y - span.y).abs() <= tolerance
        });

        if same_line {
            lines.last_mut().unwrap().push(span);
        } else {
            lines.push(vec![span]);
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    }

    lines
}
