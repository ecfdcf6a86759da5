//! # skimpdf
//!
//! Heading-outline extraction and persona-driven section ranking for PDF
//! corpora.
//!
//! The library runs in two stages. **Structure extraction** recovers a
//! hierarchical heading outline (H1..H4 with page anchors) from each
//! document, using content-stream spans for born-digital PDFs and an OCR
//! fallback for scanned ones. **Relevance ranking** scores the extracted
//! sections against a persona + task description and condenses the best
//! sections into refined excerpts.
//!
//! ## Quick Start
//!
//! ```no_run
//! use skimpdf::extract_outline;
//!
//! fn main() -> skimpdf::Result<()> {
//!     let outline = extract_outline("report.pdf")?;
//!     println!("{}", outline.title);
//!     for heading in &outline.outline {
//!         println!("{} {} (p.{})", heading.level, heading.text, heading.page);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Digital and scanned input**: span-based extraction with a
//!   tesseract OCR fallback
//! - **Deterministic level assignment**: size clustering with no RNG,
//!   identical output on every run
//! - **Persona/task ranking**: TF-IDF cosine scoring of sections and
//!   excerpt refinement
//! - **Batch processing**: one rayon task per document, one artifact per
//!   openable input

pub mod batch;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod rank;

pub use batch::{extract_directory, DocumentResult};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use extract::{
    document_info, extract_outline_with_options, DocumentInfo, ErrorMode, ExtractOptions,
    OcrOptions,
};
pub use model::{
    BlockOrigin, Heading, JobToBeDone, Outline, PersonaQuery, PersonaRecord, RankedSection,
    RankingRun, RefinedExcerpt, RunMetadata, TextBlock,
};
pub use rank::{run_ranking, RankOptions, RelevanceScorer};

use std::path::Path;

/// Extract the heading outline of a single PDF with default options.
///
/// Runs lenient: an unreadable document yields the degenerate untitled
/// outline rather than an error.
///
/// # Example
///
/// ```no_run
/// use skimpdf::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// println!("{} headings", outline.len());
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<Outline> {
    extract_outline_with_options(path.as_ref(), &ExtractOptions::default())
}

/// Extract an outline in strict mode: document-fatal errors propagate.
///
/// # Example
///
/// ```no_run
/// use skimpdf::extract_outline_strict;
///
/// match extract_outline_strict("document.pdf") {
///     Ok(outline) => println!("{}", outline.title),
///     Err(e) => eprintln!("unreadable: {}", e),
/// }
/// ```
pub fn extract_outline_strict<P: AsRef<Path>>(path: P) -> Result<Outline> {
    let options = ExtractOptions {
        error_mode: ErrorMode::Strict,
        ..Default::default()
    };
    extract_outline_with_options(path.as_ref(), &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let format = detect_format_from_bytes(b"%PDF-1.7\n%test").unwrap();
        assert_eq!(format.version, "1.7");
    }

    #[test]
    fn test_detect_unknown_magic() {
        let result = detect_format_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_lenient_entry_point_never_errors_on_bad_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 not really a pdf").unwrap();

        let outline = extract_outline(&path).unwrap();
        assert_eq!(outline.title, "Untitled");
        assert!(outline.is_empty());
    }

    #[test]
    fn test_strict_entry_point_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 not really a pdf").unwrap();

        assert!(extract_outline_strict(&path).is_err());
    }

    #[test]
    fn test_non_pdf_rejected_early() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, b"<!DOCTYPE html><html></html>").unwrap();

        assert!(matches!(
            extract_outline_strict(&path),
            Err(Error::UnknownFormat)
        ));
    }
}
