//! TF-IDF relevance scoring against a persona/task query.
//!
//! The query and every candidate share one vocabulary; vectors are
//! L2-normalized so the cosine similarity reduces to a dot product and
//! every score lands in [0, 1].

use std::collections::{HashMap, HashSet};

use unicode_normalization::UnicodeNormalization;

/// English stopwords excluded from the vocabulary.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "s", "same", "she",
    "should", "so", "some", "such", "t", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Scores candidate texts against a single query string.
pub struct RelevanceScorer {
    stopwords: HashSet<&'static str>,
}

impl RelevanceScorer {
    pub fn new() -> Self {
        Self {
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Cosine similarity of each candidate to the query, in candidate order.
    ///
    /// The vocabulary and document frequencies are built over the query and
    /// all candidates together, so scores are comparable across candidates
    /// of one call. An empty candidate list yields an empty result.
    pub fn score(&self, query: &str, candidates: &[&str]) -> Vec<f64> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let query_tokens = self.tokenize(query);
        let candidate_tokens: Vec<Vec<String>> =
            candidates.iter().map(|c| self.tokenize(c)).collect();

        let vocabulary = build_vocabulary(&query_tokens, &candidate_tokens);
        let idf = inverse_document_frequencies(&vocabulary, &query_tokens, &candidate_tokens);

        let query_vec = tfidf_vector(&query_tokens, &vocabulary, &idf);
        candidate_tokens
            .iter()
            .map(|tokens| {
                let vec = tfidf_vector(tokens, &vocabulary, &idf);
                cosine(&query_vec, &vec)
            })
            .collect()
    }

    /// NFC-normalize, lowercase, strip non-alphanumerics, drop stopwords.
    fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized: String = text.nfc().collect();
        normalized
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty() && !self.stopwords.contains(t))
            .map(str::to_string)
            .collect()
    }
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Term → vector index over all documents of the call.
fn build_vocabulary(query: &[String], candidates: &[Vec<String>]) -> HashMap<String, usize> {
    let mut vocabulary = HashMap::new();
    for token in query.iter().chain(candidates.iter().flatten()) {
        let next = vocabulary.len();
        vocabulary.entry(token.clone()).or_insert(next);
    }
    vocabulary
}

/// Smoothed IDF per vocabulary slot: `ln((1 + n) / (1 + df)) + 1`.
fn inverse_document_frequencies(
    vocabulary: &HashMap<String, usize>,
    query: &[String],
    candidates: &[Vec<String>],
) -> Vec<f64> {
    let n = 1 + candidates.len();
    let mut df = vec![0usize; vocabulary.len()];

    let documents = std::iter::once(query).chain(candidates.iter().map(Vec::as_slice));
    for tokens in documents {
        let unique: HashSet<&String> = tokens.iter().collect();
        for token in unique {
            if let Some(&slot) = vocabulary.get(token) {
                df[slot] += 1;
            }
        }
    }

    df.iter()
        .map(|&d| ((1 + n) as f64 / (1 + d) as f64).ln() + 1.0)
        .collect()
}

/// L2-normalized TF-IDF vector for one token sequence.
fn tfidf_vector(tokens: &[String], vocabulary: &HashMap<String, usize>, idf: &[f64]) -> Vec<f64> {
    let mut vector = vec![0.0f64; vocabulary.len()];
    for token in tokens {
        if let Some(&slot) = vocabulary.get(token) {
            vector[slot] += 1.0;
        }
    }
    for (slot, value) in vector.iter_mut().enumerate() {
        *value *= idf[slot];
    }

    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in &mut vector {
            *value /= norm;
        }
    }
    vector
}

/// Dot product of two L2-normalized vectors, clamped to [0, 1].
fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot.clamp(0.0, 1.0)
}
