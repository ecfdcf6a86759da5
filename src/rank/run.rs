//! A full ranking run over a directory of structure artifacts.
//!
//! Reads the `{stem}.json` outlines produced by the extraction batch,
//! pairs each with its companion `{stem}.pdf` for section body text, and
//! emits a single run-level artifact. Malformed inputs degrade per
//! document or per record, never per run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;

use crate::error::Result;
use crate::extract::{LopdfSource, PageSource};
use crate::model::{
    Heading, JobToBeDone, PersonaQuery, PersonaRecord, RankingRun, RefinedExcerpt, RunMetadata,
};

use super::refine::{refine_section, DEFAULT_MAX_CHUNKS};
use super::scorer::RelevanceScorer;
use super::sections::{rank_sections, DEFAULT_TOP_N};

/// Default number of leading ranks that receive sub-section analysis.
pub const DEFAULT_REFINE_TOP: usize = 10;

/// Knobs for one ranking run.
#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Sections kept in `extracted_sections`.
    pub top_n: usize,
    /// Leading ranks that get a refined excerpt.
    pub refine_top: usize,
    /// Chunks joined into each refined excerpt.
    pub max_chunks: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            refine_top: DEFAULT_REFINE_TOP,
            max_chunks: DEFAULT_MAX_CHUNKS,
        }
    }
}

/// One document admitted to the ranking pool.
struct RankingInput {
    pdf_name: String,
    pdf_path: PathBuf,
    headings: Vec<Heading>,
}

/// Execute a ranking run.
///
/// `json_dir` holds the structure artifacts; `pdf_dir` holds the companion
/// PDFs under the same stems. Each document is ranked in its own pass, so
/// `importance_rank` restarts at 1 per document. Documents whose artifact
/// is unreadable or malformed, or whose companion PDF is missing, are
/// skipped with a warning and do not appear in `input_documents`.
pub fn run_ranking(
    json_dir: &Path,
    pdf_dir: &Path,
    query: &PersonaQuery,
    options: &RankOptions,
) -> Result<RankingRun> {
    let inputs = collect_inputs(json_dir, pdf_dir)?;

    let scorer = RelevanceScorer::new();
    let mut extracted_sections = Vec::new();
    let mut sub_section_analysis = Vec::new();
    let mut sources: HashMap<String, LopdfSource> = HashMap::new();

    for input in &inputs {
        let ranked = rank_sections(
            &scorer,
            query,
            &input.pdf_name,
            &input.headings,
            options.top_n,
        );

        for section in &ranked {
            if section.importance_rank as usize > options.refine_top {
                continue;
            }
            match section_body(&mut sources, &input.pdf_path, &section.document, section.page_number)
            {
                Ok(body) => sub_section_analysis.push(RefinedExcerpt {
                    document: section.document.clone(),
                    refined_text: refine_section(&scorer, query, &body, options.max_chunks),
                    page_number: section.page_number,
                }),
                Err(e) => log::warn!(
                    "No body text for {} page {}: {}",
                    section.document,
                    section.page_number,
                    e
                ),
            }
        }

        extracted_sections.extend(ranked);
    }

    Ok(RankingRun {
        metadata: RunMetadata {
            input_documents: inputs.into_iter().map(|i| i.pdf_name).collect(),
            persona: PersonaRecord {
                name: None,
                description: query.persona.clone(),
            },
            job_to_be_done: JobToBeDone {
                description: query.task.clone(),
            },
            processing_timestamp: Utc::now(),
        },
        extracted_sections,
        sub_section_analysis,
    })
}

/// Gather the documents admitted to the run, in file-name order.
fn collect_inputs(json_dir: &Path, pdf_dir: &Path) -> Result<Vec<RankingInput>> {
    let mut json_paths: Vec<PathBuf> = fs::read_dir(json_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")))
        .collect();
    json_paths.sort();

    let mut inputs = Vec::new();
    for json_path in json_paths {
        let stem = match json_path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };

        let raw = match fs::read_to_string(&json_path) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Skipping {}: unreadable artifact: {}", json_path.display(), e);
                continue;
            }
        };
        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Skipping {}: invalid JSON: {}", json_path.display(), e);
                continue;
            }
        };

        let headings = match parse_outline(&value, &stem) {
            Some(headings) => headings,
            None => continue,
        };

        let pdf_name = format!("{}.pdf", stem);
        let pdf_path = pdf_dir.join(&pdf_name);
        if !pdf_path.is_file() {
            log::warn!("Skipping {}: companion PDF {} not found", stem, pdf_name);
            continue;
        }

        inputs.push(RankingInput {
            pdf_name,
            pdf_path,
            headings,
        });
    }

    Ok(inputs)
}

/// Pull the heading list out of a structure artifact.
///
/// Returns `None` (document skipped) when the `outline` key is missing or
/// not an array. Individual records missing `text`, `level`, or `page`
/// are dropped with a warning; their siblings survive.
fn parse_outline(value: &Value, document: &str) -> Option<Vec<Heading>> {
    let outline = match value.get("outline").and_then(Value::as_array) {
        Some(outline) => outline,
        None => {
            log::warn!("Skipping {}: missing or malformed outline key", document);
            return None;
        }
    };

    let mut headings = Vec::with_capacity(outline.len());
    for record in outline {
        let text = record.get("text").and_then(Value::as_str);
        let level = record.get("level").and_then(Value::as_str);
        let page = record.get("page").and_then(Value::as_u64);
        match (text, level, page) {
            (Some(text), Some(level), Some(page)) => {
                headings.push(Heading::new(level, text, page as u32));
            }
            _ => log::warn!("Dropping malformed heading record in {}: {}", document, record),
        }
    }

    Some(headings)
}

/// Body text of a ranked section: the extractable text of its anchor page.
fn section_body(
    sources: &mut HashMap<String, LopdfSource>,
    pdf_path: &Path,
    document: &str,
    page: u32,
) -> Result<String> {
    if !sources.contains_key(document) {
        sources.insert(document.to_string(), LopdfSource::load_file(pdf_path)?);
    }
    // Present by construction.
    let source = &sources[document];
    source.page_text(page)
}
