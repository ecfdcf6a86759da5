//! Positioned text blocks produced by the extractors.

use serde::{Deserialize, Serialize};

/// Which extraction path produced a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockOrigin {
    /// Extracted from the PDF content stream (born-digital page).
    Digital,
    /// Recognized from a rasterized page image.
    Ocr,
}

/// A positioned text block with its visual size signal.
///
/// Blocks are immutable once produced: the digital extractor carries the
/// representative span's font size in `size_metric`, the OCR extractor the
/// recognized word's bounding-box height. `emphasis` is only meaningful on
/// the digital path; visual weight is not recoverable from OCR output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    /// The text content (trimmed, non-empty).
    pub text: String,
    /// 1-based page number.
    pub page: u32,
    /// Font size (digital) or bounding-box height (OCR) in points/pixels.
    pub size_metric: f32,
    /// Whether the text carries bold/visual weight.
    pub emphasis: bool,
    /// Which extractor produced this block.
    pub origin: BlockOrigin,
}

impl TextBlock {
    /// Create a digital-path block.
    pub fn digital(text: impl Into<String>, page: u32, font_size: f32, bold: bool) -> Self {
        Self {
            text: text.into(),
            page,
            size_metric: font_size,
            emphasis: bold,
            origin: BlockOrigin::Digital,
        }
    }

    /// Create an OCR-path block. OCR cannot recover emphasis.
    pub fn ocr(text: impl Into<String>, page: u32, box_height: f32) -> Self {
        Self {
            text: text.into(),
            page,
            size_metric: box_height,
            emphasis: false,
            origin: BlockOrigin::Ocr,
        }
    }

    /// Number of whitespace-separated words in the block.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
