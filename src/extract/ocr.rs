//! OCR-path block extraction for scanned documents.
//!
//! Rasterizes each page with pdfium and runs the external `tesseract`
//! binary in TSV mode to recover word-level boxes. The bounding-box height
//! of each recognized word becomes the block's size signal; visual weight
//! is not recoverable from OCR, so `emphasis` is always false.

use std::path::Path;
use std::process::Command;

use image::ImageFormat;
use pdfium_render::prelude::*;

use crate::error::{Error, Result};
use crate::model::TextBlock;

/// Options for the OCR extraction path.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Rasterization resolution in dots per inch.
    pub dpi: u32,
    /// Tesseract language set (not auto-detected), e.g. "eng+hin+deu+fra".
    pub languages: String,
    /// Name or path of the tesseract executable.
    pub tesseract_cmd: String,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            dpi: 300,
            languages: "eng+hin+deu+fra".to_string(),
            tesseract_cmd: "tesseract".to_string(),
        }
    }
}

/// What the OCR path recovers from a document.
#[derive(Debug, Clone)]
pub struct OcrExtraction {
    /// Word-level blocks across all pages, in ascending page order.
    pub blocks: Vec<TextBlock>,
    /// Visual lines of the first recognized page, for title recovery.
    pub first_page_lines: Vec<String>,
}

/// Extract OCR text blocks from every page of a document.
///
/// Per-page failures (rasterization or recognition) are caught and logged;
/// the failing page contributes no blocks and its siblings are unaffected.
/// Results are always in ascending page order.
pub fn extract_blocks_ocr(path: &Path, options: &OcrOptions) -> Result<OcrExtraction> {
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| Error::Raster(format!("Failed to load PDF for rasterization: {:?}", e)))?;

    let scratch = tempfile::tempdir()?;
    let mut blocks = Vec::new();
    let mut first_page_lines: Vec<String> = Vec::new();

    for (index, page) in document.pages().iter().enumerate() {
        let page_num = index as u32 + 1;
        match ocr_page(&page, page_num, options, scratch.path()) {
            Ok((mut page_blocks, page_lines)) => {
                if first_page_lines.is_empty() {
                    first_page_lines = page_lines;
                }
                blocks.append(&mut page_blocks);
            }
            Err(e) => log::warn!("OCR failed on page {}: {}", page_num, e),
        }
    }

    Ok(OcrExtraction {
        blocks,
        first_page_lines,
    })
}

/// Rasterize and recognize a single page.
fn ocr_page(
    page: &PdfPage,
    page_num: u32,
    options: &OcrOptions,
    scratch: &Path,
) -> Result<(Vec<TextBlock>, Vec<String>)> {
    // Points are 1/72 inch; scale to the requested DPI.
    let width_px = (page.width().value / 72.0 * options.dpi as f32).round() as i32;
    let config = PdfRenderConfig::new().set_target_width(width_px.max(1));

    let bitmap = page
        .render_with_config(&config)
        .map_err(|e| Error::Raster(format!("{:?}", e)))?;
    let image = bitmap.as_image();

    let png_path = scratch.join(format!("page-{}.png", page_num));
    image
        .save_with_format(&png_path, ImageFormat::Png)
        .map_err(|e| Error::Raster(e.to_string()))?;

    let tsv = run_tesseract(&png_path, options)?;
    Ok((parse_tsv_words(&tsv, page_num), parse_tsv_lines(&tsv)))
}

/// Invoke tesseract and capture its TSV output.
fn run_tesseract(image_path: &Path, options: &OcrOptions) -> Result<String> {
    let output = Command::new(&options.tesseract_cmd)
        .arg(image_path)
        .arg("stdout")
        .arg("-l")
        .arg(&options.languages)
        .arg("--dpi")
        .arg(options.dpi.to_string())
        .arg("tsv")
        .output()
        .map_err(|e| Error::Ocr(format!("Failed to run {}: {}", options.tesseract_cmd, e)))?;

    if !output.status.success() {
        return Err(Error::Ocr(format!(
            "tesseract exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    String::from_utf8(output.stdout).map_err(|e| Error::Ocr(e.to_string()))
}

/// TSV row level for word entries.
const TSV_WORD_LEVEL: &str = "5";

/// Parse tesseract TSV output into word-level blocks.
///
/// Columns: level, page_num, block_num, par_num, line_num, word_num,
/// left, top, width, height, conf, text.
fn parse_tsv_words(tsv: &str, page: u32) -> Vec<TextBlock> {
    let mut blocks = Vec::new();

    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 || fields[0] != TSV_WORD_LEVEL {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        let height: f32 = match fields[9].parse() {
            Ok(h) => h,
            Err(_) => continue,
        };

        blocks.push(TextBlock::ocr(text, page, height));
    }

    blocks
}

/// Reassemble word rows into visual lines.
///
/// Tesseract numbers every word with its block, paragraph, and line; words
/// sharing all three sit on one printed line. Lines come back in TSV
/// (reading) order, words joined by single spaces.
fn parse_tsv_lines(tsv: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut key: Option<(String, String, String)> = None;
    let mut words: Vec<&str> = Vec::new();

    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 || fields[0] != TSV_WORD_LEVEL {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        let row_key = (
            fields[2].to_string(),
            fields[3].to_string(),
            fields[4].to_string(),
        );
        if key.as_ref() != Some(&row_key) {
            if !words.is_empty() {
                lines.push(words.join(" "));
                words.clear();
            }
            key = Some(row_key);
        }
        words.push(text);
    }

    if !words.is_empty() {
        lines.push(words.join(" "));
    }

    lines
}

/// Bind to the pdfium library, preferring the system install.
fn bind_pdfium() -> Result<Pdfium> {
    Pdfium::bind_to_system_library()
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        })
        .map(Pdfium::new)
        .map_err(|e| Error::Raster(format!("pdfium library not available: {:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockOrigin;

    const SAMPLE_TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
        1\t1\t0\t0\t0\t0\t0\t0\t2550\t3300\t-1\t\n\
        5\t1\t1\t1\t1\t1\t210\t180\t640\t96\t96.2\tANNUAL\n\
        5\t1\t1\t1\t1\t2\t880\t180\t700\t96\t95.0\tREPORT\n\
        5\t1\t1\t2\t1\t1\t210\t400\t300\t34\t91.7\tRevenue\n\
        5\t1\t1\t2\t1\t2\t540\t400\t120\t34\t12.0\t   \n";

    #[test]
    fn test_parse_tsv_words() {
        let blocks = parse_tsv_words(SAMPLE_TSV, 7);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].text, "ANNUAL");
        assert_eq!(blocks[0].size_metric, 96.0);
        assert_eq!(blocks[0].page, 7);
        assert_eq!(blocks[0].origin, BlockOrigin::Ocr);
        assert!(!blocks[0].emphasis);
        assert_eq!(blocks[2].text, "Revenue");
        assert_eq!(blocks[2].size_metric, 34.0);
    }

    #[test]
    fn test_parse_tsv_skips_non_word_rows_and_blanks() {
        let blocks = parse_tsv_words(SAMPLE_TSV, 1);
        // Row with level 1 and the whitespace-only word are dropped.
        assert!(blocks.iter().all(|b| !b.text.trim().is_empty()));
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn test_parse_tsv_empty_input() {
        assert!(parse_tsv_words("", 1).is_empty());
        assert!(parse_tsv_words("level\tpage_num\n", 1).is_empty());
    }

    #[test]
    fn test_parse_tsv_lines_groups_by_line_numbering() {
        let lines = parse_tsv_lines(SAMPLE_TSV);
        assert_eq!(lines, vec!["ANNUAL REPORT", "Revenue"]);
    }

    #[test]
    fn test_parse_tsv_lines_empty_input() {
        assert!(parse_tsv_lines("").is_empty());
        assert!(parse_tsv_lines("level\tpage_num\n").is_empty());
    }

    #[test]
    fn test_default_options() {
        let options = OcrOptions::default();
        assert_eq!(options.dpi, 300);
        assert!(options.languages.contains("eng"));
    }
}
