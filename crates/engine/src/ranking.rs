//! Ranking order shared by the personalized and cold-start paths.
//!
//! Score descending, then item id ascending. `f32::total_cmp` makes the
//! order total, so equal inputs always produce identical output.

use crate::types::ScoredCandidate;
use data_loader::ItemId;
use std::cmp::Ordering;

pub fn compare_ranked(a: (f32, ItemId), b: (f32, ItemId)) -> Ordering {
    b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1))
}

fn by_display_score(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    compare_ranked((a.display_score, a.item_id), (b.display_score, b.item_id))
}

/// Keep the best `n` candidates, ordered.
///
/// When `n` is smaller than the input, a partial selection finds the top
/// `n` before sorting only those.
pub fn top_n(mut candidates: Vec<ScoredCandidate>, n: usize) -> Vec<ScoredCandidate> {
    if n == 0 {
        return Vec::new();
    }
    if candidates.len() > n {
        candidates.select_nth_unstable_by(n - 1, by_display_score);
        candidates.truncate(n);
    }
    candidates.sort_unstable_by(by_display_score);
    candidates
}
