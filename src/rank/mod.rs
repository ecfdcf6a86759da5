//! Relevance ranking: persona/task-conditioned section selection.

pub mod refine;
pub mod run;
pub mod scorer;
pub mod sections;

pub use refine::{refine_section, DEFAULT_MAX_CHUNKS};
pub use run::{run_ranking, RankOptions, DEFAULT_REFINE_TOP};
pub use scorer::RelevanceScorer;
pub use sections::{rank_sections, DEFAULT_TOP_N};
