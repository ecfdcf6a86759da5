//! Persona/task query and ranking-run output types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The free-text reader description used as the relevance query.
///
/// Supplied once per ranking run; the two fields are concatenated into a
/// single query string at use time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaQuery {
    /// Who is reading (role, expertise).
    pub persona: String,
    /// What they are trying to accomplish.
    pub task: String,
}

impl PersonaQuery {
    pub fn new(persona: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            task: task.into(),
        }
    }

    /// The combined query string scored against candidate texts.
    pub fn query_text(&self) -> String {
        format!("{} {}", self.persona, self.task)
    }
}

/// A section selected by the ranker, with its dense 1-based importance rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    pub document: String,
    pub page_number: u32,
    pub section_title: String,
    pub importance_rank: u32,
}

/// The condensed excerpt produced by the refiner for one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedExcerpt {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

/// Persona description as it appears in the run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,
}

/// Task description as it appears in the run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobToBeDone {
    pub description: String,
}

/// Metadata block of the ranking-run artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub input_documents: Vec<String>,
    pub persona: PersonaRecord,
    pub job_to_be_done: JobToBeDone,
    pub processing_timestamp: DateTime<Utc>,
}

/// The single JSON artifact emitted by one ranking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRun {
    pub metadata: RunMetadata,
    pub extracted_sections: Vec<RankedSection>,
    pub sub_section_analysis: Vec<RefinedExcerpt>,
}
