//! Heading candidate filtering.
//!
//! The filter is a conjunction of named sub-checks: a length/content gate
//! that rejects noise, a disjunctive structural-signal gate that accepts
//! numbered, bold, or all-caps lines, and a date exclusion. Each sub-check
//! is independently callable so the gates can be tested in isolation.

use regex::Regex;

use crate::model::{BlockOrigin, TextBlock};

/// Words that never stand alone as headings.
const STANDALONE_STOPWORDS: [&str; 4] = ["the", "and", "this", "that"];

/// Minimum trimmed length for a digital-path candidate.
const MIN_LEN_DIGITAL: usize = 5;
/// Minimum trimmed length for an OCR-path candidate.
const MIN_LEN_OCR: usize = 5;
/// Maximum trimmed length for an OCR-path candidate.
const MAX_LEN_OCR: usize = 120;

/// Predicate deciding structural-heading plausibility of a text block.
pub struct HeadingFilter {
    numeric_prefix: Regex,
    date_like: Regex,
}

impl HeadingFilter {
    pub fn new() -> Self {
        Self {
            // Dotted-decimal outline prefix, optionally followed by a
            // separator: "1 Scope", "2.3 Methods", "4.1.2: Results".
            numeric_prefix: Regex::new(r"^\d+(\.\d+)*[.):\-]?(\s|$)").unwrap(),
            date_like: Regex::new(r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}").unwrap(),
        }
    }

    /// Whether a block passes every gate.
    pub fn is_candidate(&self, block: &TextBlock) -> bool {
        let text = block.text.trim();

        self.meets_length_gate(text, block.origin)
            && has_alphabetic_run(text)
            && !is_standalone_stopword(text)
            && self.has_structural_signal(text, block.emphasis)
            && !self.is_date_like(text)
    }

    /// Length gate: the OCR path adds an upper bound, since OCR lines are
    /// unbounded by the digital word cap.
    pub fn meets_length_gate(&self, text: &str, origin: BlockOrigin) -> bool {
        let len = text.chars().count();
        match origin {
            BlockOrigin::Digital => len >= MIN_LEN_DIGITAL,
            BlockOrigin::Ocr => len >= MIN_LEN_OCR && len <= MAX_LEN_OCR,
        }
    }

    /// Disjunctive structural-signal gate: bold, fully upper-case, or a
    /// dotted-decimal outline prefix.
    pub fn has_structural_signal(&self, text: &str, emphasis: bool) -> bool {
        emphasis || is_all_uppercase(text) || self.numeric_prefix.is_match(text)
    }

    /// Date exclusion: date-shaped text is rejected even when it would
    /// otherwise pass the structural gate.
    pub fn is_date_like(&self, text: &str) -> bool {
        self.date_like.is_match(text)
    }
}

impl Default for HeadingFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Content gate: the text must contain a run of at least 3 consecutive
/// alphabetic characters, rejecting pure numeric/punctuation noise.
pub fn has_alphabetic_run(text: &str) -> bool {
    let mut run = 0;
    for c in text.chars() {
        if c.is_alphabetic() {
            run += 1;
            if run >= 3 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Whether the text is a closed-set stopword used as standalone text.
pub fn is_standalone_stopword(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    STANDALONE_STOPWORDS.contains(&lower.as_str())
}

/// Whether every letter in the text is upper-case (and at least one exists).
pub fn is_all_uppercase(text: &str) -> bool {
    let mut saw_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            saw_letter = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    saw_letter
}

/// Filter a block sequence down to its heading candidates, preserving order.
pub fn candidates<'a>(filter: &HeadingFilter, blocks: &'a [TextBlock]) -> Vec<&'a TextBlock> {
    blocks.iter().filter(|b| filter.is_candidate(b)).collect()
}
