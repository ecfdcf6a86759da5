//! Heading-level assignment by 1-D size clustering.
//!
//! Candidates are partitioned over their size signal with a deterministic
//! k-means with quantile-spaced initial centroids over the sorted distinct
//! values. The whole step is a pure function of the input: no RNG, no
//! seed, identical labels on every run and platform.

use crate::model::{Heading, TextBlock};

/// Maximum number of heading levels.
pub const MAX_LEVELS: usize = 4;

/// Iteration cap for Lloyd's algorithm; 1-D clustering converges long
/// before this on real size distributions.
const MAX_ITERATIONS: usize = 100;

/// Cluster count as a pure function of the signal's distinct-value count.
pub fn cluster_count(distinct_values: usize) -> usize {
    distinct_values.min(MAX_LEVELS)
}

/// A size bucket produced during level assignment.
struct LevelCluster {
    centroid: f32,
    /// 0 = largest centroid.
    rank_by_size: usize,
}

/// Assign heading levels to candidates by clustering their size signal.
///
/// Returns headings in the original candidate order (document reading
/// order). Fewer than 2 candidates means no structure is detectable and
/// an empty vector is returned; the caller treats that as "no structure
/// found" and falls back accordingly.
pub fn assign_levels(candidates: &[&TextBlock]) -> Vec<Heading> {
    if candidates.len() < 2 {
        return Vec::new();
    }

    let signal: Vec<f32> = candidates.iter().map(|b| b.size_metric).collect();
    let distinct = distinct_sorted(&signal);
    let k = cluster_count(distinct.len());
    if k < 1 {
        return Vec::new();
    }

    let assignments = kmeans_1d(&signal, &distinct, k);
    let clusters = rank_clusters(&signal, &assignments, k);

    candidates
        .iter()
        .zip(&assignments)
        .map(|(block, &cluster_id)| {
            let level = format!("H{}", clusters[cluster_id].rank_by_size + 1);
            Heading::new(level, block.text.clone(), block.page)
        })
        .collect()
}

/// Sorted, deduplicated signal values (ascending).
fn distinct_sorted(signal: &[f32]) -> Vec<f32> {
    let mut values = signal.to_vec();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values.dedup();
    values
}

/// Lloyd's algorithm over a 1-D signal with quantile-spaced initialization.
///
/// Returns the cluster index of each signal value. Assignment ties go to
/// the lower cluster index, so the result is fully deterministic.
fn kmeans_1d(signal: &[f32], distinct: &[f32], k: usize) -> Vec<usize> {
    let mut centroids: Vec<f32> = (0..k)
        .map(|i| {
            if k == 1 {
                distinct[0]
            } else {
                distinct[i * (distinct.len() - 1) / (k - 1)]
            }
        })
        .collect();

    let mut assignments = vec![0usize; signal.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;

        for (i, &value) in signal.iter().enumerate() {
            let nearest = nearest_centroid(&centroids, value);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed = true;
            }
        }

        for (cluster_id, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<f32> = signal
                .iter()
                .zip(&assignments)
                .filter(|(_, &a)| a == cluster_id)
                .map(|(&v, _)| v)
                .collect();
            if !members.is_empty() {
                *centroid = members.iter().sum::<f32>() / members.len() as f32;
            }
        }

        if !changed {
            break;
        }
    }

    assignments
}

fn nearest_centroid(centroids: &[f32], value: f32) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, &c) in centroids.iter().enumerate() {
        let dist = (value - c).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Compute final centroids and size ranks: rank 0 is the largest centroid,
/// ties broken by cluster id ascending.
fn rank_clusters(signal: &[f32], assignments: &[usize], k: usize) -> Vec<LevelCluster> {
    let mut clusters: Vec<LevelCluster> = (0..k)
        .map(|cluster_id| {
            let members: Vec<f32> = signal
                .iter()
                .zip(assignments)
                .filter(|(_, &a)| a == cluster_id)
                .map(|(&v, _)| v)
                .collect();
            let centroid = if members.is_empty() {
                f32::NEG_INFINITY
            } else {
                members.iter().sum::<f32>() / members.len() as f32
            };
            LevelCluster {
                centroid,
                rank_by_size: 0,
            }
        })
        .collect();

    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| {
        clusters[b]
            .centroid
            .partial_cmp(&clusters[a].centroid)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    for (rank, &cluster_id) in order.iter().enumerate() {
        clusters[cluster_id].rank_by_size = rank;
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str, size: f32) -> TextBlock {
        TextBlock::digital(text, 1, size, false)
    }

    #[test]
    fn test_cluster_count_is_pure() {
        assert_eq!(cluster_count(0), 0);
        assert_eq!(cluster_count(1), 1);
        assert_eq!(cluster_count(3), 3);
        assert_eq!(cluster_count(9), 4);
    }

    #[test]
    fn test_fewer_than_two_candidates_is_no_structure() {
        assert!(assign_levels(&[]).is_empty());
        let only = block("Lonely heading", 18.0);
        assert!(assign_levels(&[&only]).is_empty());
    }

    #[test]
    fn test_three_size_groups_three_levels() {
        // Sizes [24, 24, 18, 12, 12] with k = 3: the 24s get H1, the 18
        // H2, the 12s H3, regardless of input order.
        let blocks = vec![
            block("Second big", 24.0),
            block("Small one", 12.0),
            block("Middle", 18.0),
            block("First big", 24.0),
            block("Small two", 12.0),
        ];
        let refs: Vec<&TextBlock> = blocks.iter().collect();
        let headings = assign_levels(&refs);

        let levels: Vec<&str> = headings.iter().map(|h| h.level.as_str()).collect();
        assert_eq!(levels, vec!["H1", "H3", "H2", "H1", "H3"]);
        // Output preserves candidate order, not level order.
        assert_eq!(headings[0].text, "Second big");
        assert_eq!(headings[4].text, "Small two");
    }

    #[test]
    fn test_two_identical_sizes_single_level() {
        let blocks = vec![block("One", 14.0), block("Two", 14.0)];
        let refs: Vec<&TextBlock> = blocks.iter().collect();
        let headings = assign_levels(&refs);
        assert_eq!(headings.len(), 2);
        assert!(headings.iter().all(|h| h.level == "H1"));
    }

    #[test]
    fn test_level_cap_at_four() {
        let blocks: Vec<TextBlock> = [32.0, 26.0, 20.0, 14.0, 10.0, 8.0]
            .iter()
            .enumerate()
            .map(|(i, &s)| block(&format!("Heading {}", i), s))
            .collect();
        let refs: Vec<&TextBlock> = blocks.iter().collect();
        let headings = assign_levels(&refs);

        let mut levels: Vec<String> = headings.iter().map(|h| h.level.clone()).collect();
        levels.sort();
        levels.dedup();
        assert!(levels.len() <= MAX_LEVELS);
        assert!(levels.contains(&"H1".to_string()));
    }

    #[test]
    fn test_size_ordering_invariant() {
        // Every member of a higher level must be at least as large as
        // every member of the next level down.
        let blocks: Vec<TextBlock> = [24.0, 23.5, 18.0, 17.5, 12.0, 11.0]
            .iter()
            .enumerate()
            .map(|(i, &s)| block(&format!("Heading {}", i), s))
            .collect();
        let refs: Vec<&TextBlock> = blocks.iter().collect();
        let headings = assign_levels(&refs);

        let mut by_level: std::collections::BTreeMap<String, Vec<f32>> = Default::default();
        for (heading, block) in headings.iter().zip(&blocks) {
            by_level
                .entry(heading.level.clone())
                .or_default()
                .push(block.size_metric);
        }

        let levels: Vec<&String> = by_level.keys().collect();
        for pair in levels.windows(2) {
            let upper_min = by_level[pair[0]].iter().cloned().fold(f32::INFINITY, f32::min);
            let lower_max = by_level[pair[1]]
                .iter()
                .cloned()
                .fold(f32::NEG_INFINITY, f32::max);
            assert!(
                upper_min >= lower_max,
                "level {} min {} < level {} max {}",
                pair[0],
                upper_min,
                pair[1],
                lower_max
            );
        }
    }

    #[test]
    fn test_determinism() {
        let blocks: Vec<TextBlock> = [24.0, 18.0, 12.0, 24.0, 18.0, 9.0, 30.0]
            .iter()
            .enumerate()
            .map(|(i, &s)| block(&format!("Heading {}", i), s))
            .collect();
        let refs: Vec<&TextBlock> = blocks.iter().collect();

        let first = assign_levels(&refs);
        let second = assign_levels(&refs);
        assert_eq!(first, second);
    }
}
