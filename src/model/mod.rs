//! Data model for outline extraction and relevance ranking.

mod block;
pub mod outline;
mod query;

pub use block::{BlockOrigin, TextBlock};
pub use outline::{Heading, Outline, FALLBACK_TITLE, FALLBACK_TITLE_NO_LINES};
pub use query::{
    JobToBeDone, PersonaQuery, PersonaRecord, RankedSection, RankingRun, RefinedExcerpt,
    RunMetadata,
};
