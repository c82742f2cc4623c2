use std::collections::HashSet;

use crate::models::Recommendation;

/// Maximum size of a returned recommendation set
pub const MAX_RESULTS: usize = 10;

/// Merges candidates into the final ranked list
///
/// Input order is the fixed generator concatenation order (seasonal,
/// time-based, popularity). Duplicates are resolved first-seen-wins, so a
/// product surfaced by two generators keeps the earlier generator's score
/// and reason. The surviving set is stable-sorted by score descending and
/// truncated to `MAX_RESULTS`.
pub fn dedupe_and_rank(candidates: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Recommendation> = candidates
        .into_iter()
        .filter(|rec| seen.insert(rec.product_id))
        .collect();

    unique.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    unique.truncate(MAX_RESULTS);

    unique
}
