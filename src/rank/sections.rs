//! Section ranking: order headings by query relevance.

use crate::model::{Heading, PersonaQuery, RankedSection};

use super::scorer::RelevanceScorer;

/// Default number of sections kept per ranking pass.
pub const DEFAULT_TOP_N: usize = 10;

/// Score a document's headings against the query and keep the best `top_n`.
///
/// Ranking is a per-document pass: each document gets its own vocabulary
/// and its own dense 1-based rank sequence, restarting at 1. The sort is
/// stable and descending, so equal scores keep document (reading) order.
pub fn rank_sections(
    scorer: &RelevanceScorer,
    query: &PersonaQuery,
    document: &str,
    headings: &[Heading],
    top_n: usize,
) -> Vec<RankedSection> {
    let texts: Vec<&str> = headings.iter().map(|h| h.text.as_str()).collect();
    let scores = scorer.score(&query.query_text(), &texts);

    let mut order: Vec<usize> = (0..headings.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(top_n);

    order
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            let heading = &headings[slot];
            RankedSection {
                document: document.to_string(),
                page_number: heading.page,
                section_title: heading.text.clone(),
                importance_rank: i as u32 + 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> PersonaQuery {
        PersonaQuery::new("financial analyst", "assess revenue growth drivers")
    }

    #[test]
    fn test_most_relevant_heading_ranks_first() {
        let scorer = RelevanceScorer::new();
        let headings = vec![
            Heading::new("H1", "Corporate governance", 2),
            Heading::new("H1", "Revenue growth analysis", 5),
            Heading::new("H2", "Office locations", 9),
        ];

        let ranked = rank_sections(&scorer, &query(), "report.pdf", &headings, 10);
        assert_eq!(ranked[0].section_title, "Revenue growth analysis");
        assert_eq!(ranked[0].importance_rank, 1);
        assert_eq!(ranked[0].page_number, 5);
        assert_eq!(ranked[0].document, "report.pdf");
    }

    #[test]
    fn test_ranks_dense_one_based_after_truncation() {
        let scorer = RelevanceScorer::new();
        let headings: Vec<Heading> = (1..=6)
            .map(|i| Heading::new("H1", format!("Section number {}", i), i))
            .collect();

        let ranked = rank_sections(&scorer, &query(), "doc.pdf", &headings, 4);
        assert_eq!(ranked.len(), 4);
        let ranks: Vec<u32> = ranked.iter().map(|r| r.importance_rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ties_keep_reading_order() {
        let scorer = RelevanceScorer::new();
        // Both headings score 0 against the query; stable sort keeps
        // document order.
        let headings = vec![
            Heading::new("H1", "Penguin colonies", 1),
            Heading::new("H1", "Glacier formation", 2),
        ];

        let ranked = rank_sections(&scorer, &query(), "doc.pdf", &headings, 10);
        assert_eq!(ranked[0].section_title, "Penguin colonies");
        assert_eq!(ranked[1].section_title, "Glacier formation");
    }

    #[test]
    fn test_each_document_ranks_restart_at_one() {
        let scorer = RelevanceScorer::new();
        let first = vec![
            Heading::new("H1", "Revenue growth drivers", 3),
            Heading::new("H2", "Cafeteria menu", 7),
        ];
        let second = vec![Heading::new("H1", "Revenue outlook", 1)];

        let ranked_a = rank_sections(&scorer, &query(), "a.pdf", &first, 10);
        let ranked_b = rank_sections(&scorer, &query(), "b.pdf", &second, 10);

        let ranks_a: Vec<u32> = ranked_a.iter().map(|r| r.importance_rank).collect();
        assert_eq!(ranks_a, vec![1, 2]);
        assert_eq!(ranked_b[0].importance_rank, 1);
    }

    #[test]
    fn test_no_headings_no_sections() {
        let scorer = RelevanceScorer::new();
        assert!(rank_sections(&scorer, &query(), "doc.pdf", &[], 10).is_empty());
    }
}
