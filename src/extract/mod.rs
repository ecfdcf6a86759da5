//! Structure extraction: heading hierarchy recovery with OCR fallback.

pub mod backend;
pub mod blocks;
pub mod cluster;
pub mod dedup;
pub mod filter;
pub mod ocr;
pub mod pipeline;
pub mod scan;
pub mod title;

pub use backend::{LopdfSource, PageSource, Span};
pub use cluster::assign_levels;
pub use dedup::dedup_headings;
pub use filter::HeadingFilter;
pub use ocr::OcrOptions;
pub use pipeline::{
    document_info, extract_outline_with_options, run_pipeline, DocumentInfo, ErrorMode,
    ExtractOptions, ExtractionPath,
};
pub use scan::is_scanned;
