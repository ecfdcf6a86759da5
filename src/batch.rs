//! Directory batch for structure extraction.
//!
//! Every document runs its own pipeline with no shared mutable state, so
//! the batch is one rayon task per file. The batch always runs lenient:
//! an unreadable document still produces its artifact (the degenerate
//! outline) and never stops its siblings.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Result;
use crate::extract::{extract_outline_with_options, ErrorMode, ExtractOptions};

/// Outcome of one document in a batch.
#[derive(Debug, Clone)]
pub struct DocumentResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub headings: usize,
    /// Set when the artifact could not be written.
    pub error: Option<String>,
}

impl DocumentResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Extract outlines for every PDF in `input_dir`, writing one
/// `{stem}.json` per document into `output_dir`.
///
/// Results come back sorted by input file name regardless of completion
/// order. `tick` fires once per finished document, whatever the outcome.
pub fn extract_directory<F>(
    input_dir: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
    tick: F,
) -> Result<Vec<DocumentResult>>
where
    F: Fn() + Sync,
{
    fs::create_dir_all(output_dir)?;
    let inputs = pdf_files(input_dir)?;

    let options = ExtractOptions {
        error_mode: ErrorMode::Lenient,
        ..options.clone()
    };

    let mut results: Vec<DocumentResult> = inputs
        .par_iter()
        .map(|input| {
            let result = process_document(input, output_dir, &options);
            tick();
            result
        })
        .collect();

    results.sort_by(|a, b| a.input.cmp(&b.input));
    Ok(results)
}

/// PDFs in a directory, sorted by file name.
pub fn pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file() && p.extension().is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn process_document(input: &Path, output_dir: &Path, options: &ExtractOptions) -> DocumentResult {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let output = output_dir.join(format!("{}.json", stem));

    // Lenient mode: this only errs on filesystem-level failures.
    let outline = match extract_outline_with_options(input, options) {
        Ok(outline) => outline,
        Err(e) => {
            return DocumentResult {
                input: input.to_path_buf(),
                output,
                title: String::new(),
                headings: 0,
                error: Some(e.to_string()),
            }
        }
    };

    let error = serde_json::to_string_pretty(&outline)
        .map_err(|e| e.to_string())
        .and_then(|json| fs::write(&output, json).map_err(|e| e.to_string()))
        .err();

    let headings = outline.len();
    DocumentResult {
        input: input.to_path_buf(),
        output,
        title: outline.title,
        headings,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_pdf_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"%PDF-1.4").unwrap();
        fs::write(dir.path().join("a.PDF"), b"%PDF-1.4").unwrap();
        fs::write(dir.path().join("notes.txt"), b"not a pdf").unwrap();

        let files = pdf_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_batch_emits_artifact_per_openable_input() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        // Not parseable as PDFs; lenient mode still yields the degenerate
        // outline for each.
        fs::write(input_dir.path().join("one.pdf"), b"%PDF-1.4 garbage").unwrap();
        fs::write(input_dir.path().join("two.pdf"), b"%PDF-1.4 garbage").unwrap();

        let ticks = AtomicUsize::new(0);
        let results = extract_directory(
            input_dir.path(),
            output_dir.path(),
            &ExtractOptions::default(),
            || {
                ticks.fetch_add(1, Ordering::Relaxed);
            },
        )
        .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(ticks.load(Ordering::Relaxed), 2);
        assert!(results.iter().all(|r| r.is_ok()));
        assert!(output_dir.path().join("one.json").is_file());
        assert!(output_dir.path().join("two.json").is_file());

        let raw = fs::read_to_string(output_dir.path().join("one.json")).unwrap();
        let outline: crate::model::Outline = serde_json::from_str(&raw).unwrap();
        assert_eq!(outline.title, "Untitled");

        // Per-document summary carries both the title and the heading count.
        assert_eq!(results[0].title, "Untitled");
        assert_eq!(results[0].headings, 0);
    }

    #[test]
    fn test_results_sorted_by_input_name() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        for name in ["zeta.pdf", "alpha.pdf", "mid.pdf"] {
            fs::write(input_dir.path().join(name), b"%PDF-1.4").unwrap();
        }

        let results = extract_directory(
            input_dir.path(),
            output_dir.path(),
            &ExtractOptions::default(),
            || {},
        )
        .unwrap();

        let names: Vec<String> = results
            .iter()
            .map(|r| r.input.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha.pdf", "mid.pdf", "zeta.pdf"]);
    }
}
