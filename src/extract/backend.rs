//! Page access layer backed by lopdf.
//!
//! Exposes the two signals the extraction pipeline needs (per-page plain
//! text, and positioned spans with font metadata) behind a small trait so
//! the pipeline can be tested without real PDFs.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// A text span with position and style information from a content stream.
#[derive(Debug, Clone)]
pub struct Span {
    /// The decoded text content.
    pub text: String,
    /// X position (left edge of the run).
    pub x: f32,
    /// Y position (baseline).
    pub y: f32,
    /// Effective font size in points (nominal size times text-matrix scale).
    pub font_size: f32,
    /// Whether the font appears to be bold.
    pub is_bold: bool,
}

impl Span {
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: &str) -> Self {
        let lower = font_name.to_lowercase();
        let is_bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        Self {
            text,
            x,
            y,
            font_size,
            is_bold,
        }
    }
}

/// Abstract page access for the extraction pipeline.
///
/// Page numbers are 1-based throughout. Implementations must return pages
/// in ascending order from [`PageSource::pages`].
pub trait PageSource {
    /// Ordered list of page numbers in the document.
    fn pages(&self) -> Vec<u32>;

    /// Plain extractable text of one page. Empty string when the page has
    /// no text operators at all (typical for scanned pages).
    fn page_text(&self, page: u32) -> Result<String>;

    /// Positioned spans of one page, in content-stream order.
    fn page_spans(&self, page: u32) -> Result<Vec<Span>>;
}

/// Simple text decoding fallback when no font encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM first (PDF standard for Unicode)
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1 fallback
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfSource: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

type PageId = (u32, u16);

/// Concrete [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    page_ids: BTreeMap<u32, PageId>,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self::from_doc(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Ok(Self::from_doc(doc))
    }

    fn from_doc(doc: LopdfDocument) -> Self {
        let page_ids = doc.get_pages();
        Self { doc, page_ids }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn page_id(&self, page: u32) -> Result<PageId> {
        self.page_ids
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.page_ids.len() as u32))
    }

    /// Raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(c) => c,
            // A page without a content stream is legal; it just has no text.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::PdfParse(e.to_string()));
                }
                Err(Error::PdfParse("Invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Decode a string operand using the current font's encoding.
    fn decode_with_font(&self, page_id: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(fonts) = self.doc.get_page_fonts(page_id) {
            if let Some(font_dict) = fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }

    /// Base font name (e.g. "Helvetica-Bold") for a font resource key.
    fn base_font_name(&self, page_id: PageId, font_name: &[u8]) -> String {
        self.doc
            .get_page_fonts(page_id)
            .ok()
            .and_then(|fonts| {
                fonts.get(font_name).and_then(|font_dict| {
                    font_dict
                        .get(b"BaseFont")
                        .ok()
                        .and_then(|o| o.as_name().ok())
                        .map(|n| String::from_utf8_lossy(n).to_string())
                })
            })
            .unwrap_or_else(|| String::from_utf8_lossy(font_name).to_string())
    }
}

impl PageSource for LopdfSource {
    fn pages(&self) -> Vec<u32> {
        self.page_ids.keys().copied().collect()
    }

    fn page_text(&self, page: u32) -> Result<String> {
        self.page_id(page)?;
        self.doc
            .extract_text(&[page])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))
    }

    fn page_spans(&self, page: u32) -> Result<Vec<Span>> {
        let page_id = self.page_id(page)?;
        let content = self.page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }

        let content = lopdf::content::Content::decode(&content)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font: Vec<u8> = Vec::new();
        let mut current_base_font = String::new();
        let mut current_size: f32 = 12.0;
        let mut cursor = TextCursor::default();
        let mut in_text = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    cursor = TextCursor::default();
                }
                "ET" => in_text = false,
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            current_font = name.clone();
                            current_base_font = self.base_font_name(page_id, name);
                        }
                        current_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        cursor.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            cursor.leading = -ty;
                        }
                        cursor.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        cursor.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => cursor.next_line(),
                "Tj" | "TJ" => {
                    if !in_text {
                        continue;
                    }
                    let text = match op.operator.as_str() {
                        "TJ" => {
                            // Array of strings interleaved with kerning adjustments;
                            // large negative adjustments mark word spaces.
                            let mut combined = String::new();
                            if let Some(Object::Array(arr)) = op.operands.first() {
                                for item in arr {
                                    match item {
                                        Object::String(bytes, _) => combined.push_str(
                                            &self.decode_with_font(page_id, &current_font, bytes),
                                        ),
                                        Object::Integer(n) => {
                                            if (-(*n as f32)) > 200.0 && needs_space(&combined) {
                                                combined.push(' ');
                                            }
                                        }
                                        Object::Real(n) => {
                                            if -n > 200.0 && needs_space(&combined) {
                                                combined.push(' ');
                                            }
                                        }
                                        _ => {}
                                    }
                                }
                            }
                            combined
                        }
                        _ => {
                            if let Some(Object::String(bytes, _)) = op.operands.first() {
                                self.decode_with_font(page_id, &current_font, bytes)
                            } else {
                                String::new()
                            }
                        }
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = cursor.position();
                        spans.push(Span::new(
                            text,
                            x,
                            y,
                            current_size * cursor.scale(),
                            &current_base_font,
                        ));
                    }
                }
                "'" | "\"" => {
                    cursor.next_line();
                    if !in_text {
                        continue;
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let text = self.decode_with_font(page_id, &current_font, bytes);
                        if !text.trim().is_empty() {
                            let (x, y) = cursor.position();
                            spans.push(Span::new(
                                text,
                                x,
                                y,
                                current_size * cursor.scale(),
                                &current_base_font,
                            ));
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }
}

/// Whether a space should be appended before the next TJ fragment.
fn needs_space(combined: &str) -> bool {
    !combined.is_empty() && !combined.ends_with(' ') && !combined.ends_with('\u{00A0}')
}

/// Text-positioning state tracked across content-stream operations.
///
/// Only position and vertical scale are needed downstream, so this keeps
/// the text matrix coefficients without full matrix composition.
#[derive(Debug, Clone)]
struct TextCursor {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
    line_start: (f32, f32),
}

impl Default for TextCursor {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 0.0,
            line_start: (0.0, 0.0),
        }
    }
}

impl TextCursor {
    #[allow(clippy::too_many_arguments)]
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_start = (e, f);
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        let (sx, sy) = self.line_start;
        self.e = sx + tx * self.a + ty * self.c;
        self.f = sy + tx * self.b + ty * self.d;
        self.line_start = (self.e, self.f);
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        // Vertical scale of the text matrix governs the rendered glyph size.
        (self.b * self.b + self.d * self.d).sqrt().max(f32::EPSILON)
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
