//! Excerpt refinement: condense a section body to its most relevant chunks.

use crate::model::PersonaQuery;

use super::scorer::RelevanceScorer;

/// Default number of chunks joined into a refined excerpt.
pub const DEFAULT_MAX_CHUNKS: usize = 3;

/// Condense a section body to its `max_chunks` most query-relevant chunks.
///
/// Chunking degrades gracefully: blank-line paragraphs first, then
/// sentences when the text is one paragraph, then the whole text as a
/// single chunk. Chunks are joined best-first with single spaces. Empty
/// input yields an empty excerpt.
pub fn refine_section(
    scorer: &RelevanceScorer,
    query: &PersonaQuery,
    body: &str,
    max_chunks: usize,
) -> String {
    let chunks = split_chunks(body);
    if chunks.is_empty() {
        return String::new();
    }

    let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
    let scores = scorer.score(&query.query_text(), &refs);

    let mut order: Vec<usize> = (0..chunks.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(max_chunks);

    order
        .into_iter()
        .map(|i| chunks[i].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a body into scoreable chunks.
fn split_chunks(body: &str) -> Vec<String> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    let paragraphs = split_paragraphs(body);
    if paragraphs.len() > 1 {
        return paragraphs;
    }

    let sentences = split_sentences(body);
    if sentences.len() > 1 {
        return sentences;
    }

    vec![body.trim().to_string()]
}

/// Paragraphs are separated by at least one blank line.
fn split_paragraphs(body: &str) -> Vec<String> {
    body.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sentences end at a `.`, `!`, or `?` run followed by whitespace.
fn split_sentences(body: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut in_terminator = false;

    for c in body.chars() {
        if matches!(c, '.' | '!' | '?') {
            current.push(c);
            in_terminator = true;
        } else if in_terminator && c.is_whitespace() {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
            in_terminator = false;
        } else {
            current.push(c);
            in_terminator = false;
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> PersonaQuery {
        PersonaQuery::new("analyst", "find revenue details")
    }

    #[test]
    fn test_empty_body_empty_excerpt() {
        let scorer = RelevanceScorer::new();
        assert_eq!(refine_section(&scorer, &query(), "", 3), "");
        assert_eq!(refine_section(&scorer, &query(), "   \n\n  ", 3), "");
    }

    #[test]
    fn test_paragraph_split_preferred() {
        let body = "Revenue grew by ten percent this year.\n\nThe office moved to a new building.\n\nRevenue details appear in the appendix.";
        let scorer = RelevanceScorer::new();
        let refined = refine_section(&scorer, &query(), body, 2);

        assert!(refined.contains("Revenue"));
        assert!(!refined.contains("office"));
    }

    #[test]
    fn test_sentence_fallback_for_single_paragraph() {
        let body = "Revenue increased sharply. Headcount stayed flat. Margins improved slightly.";
        let chunks = split_chunks(body);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "Revenue increased sharply.");
    }

    #[test]
    fn test_whole_text_fallback() {
        let body = "a single chunk with no terminator at all";
        let chunks = split_chunks(body);
        assert_eq!(chunks, vec![body.to_string()]);
    }

    #[test]
    fn test_chunks_joined_best_first() {
        let body = "Unrelated filler sentence here. Revenue details for the analyst. Another filler line follows.";
        let scorer = RelevanceScorer::new();
        let refined = refine_section(&scorer, &query(), body, 1);
        assert_eq!(refined, "Revenue details for the analyst.");
    }

    #[test]
    fn test_decimal_numbers_do_not_split_sentences() {
        let sentences = split_sentences("Growth was 3.5 percent. Costs fell.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "Growth was 3.5 percent.");
    }
}
