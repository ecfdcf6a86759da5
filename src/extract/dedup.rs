//! Order-preserving heading deduplication.

use std::collections::HashSet;

use crate::model::Heading;

/// Drop repeated headings, keeping the first occurrence.
///
/// Identity is `(lowercased text, page)`: the same text on different pages
/// is kept (running chapter heads on consecutive pages are distinct
/// anchors), while re-emitted spans on one page collapse. Single pass,
/// idempotent.
pub fn dedup_headings(headings: Vec<Heading>) -> Vec<Heading> {
    let mut seen: HashSet<(String, u32)> = HashSet::with_capacity(headings.len());
    headings
        .into_iter()
        .filter(|h| seen.insert((h.text.to_lowercase(), h.page)))
        .collect()
}
