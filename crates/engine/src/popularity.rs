//! Popularity ranking for cold-start users.
//!
//! Orders every rated item by `avg_rating * ln(1 + rating_count)`, highest
//! first, ties by item id. The order depends on the interaction store only,
//! so it stays available when no personalized model is loaded.

use crate::ranking::compare_ranked;
use crate::types::ScoredCandidate;
use data_loader::{InteractionStore, ItemId, RatingScale};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct PopularItem {
    item_id: ItemId,
    avg_rating: f32,
    popularity: f32,
}

#[derive(Debug, Clone)]
pub struct PopularityRanker {
    /// Rated items in final rank order
    ranked: Vec<PopularItem>,
    scale: RatingScale,
    confidence: f32,
}

impl PopularityRanker {
    /// Precompute the ranking from the store's item statistics
    pub fn new(store: &InteractionStore, scale: RatingScale, confidence: f32) -> Self {
        let mut ranked: Vec<PopularItem> = store
            .all_item_stats()
            .map(|(item_id, stats)| PopularItem {
                item_id,
                avg_rating: stats.avg_rating,
                popularity: stats.popularity_score,
            })
            .collect();
        ranked.sort_unstable_by(|a, b| {
            compare_ranked((a.popularity, a.item_id), (b.popularity, b.item_id))
        });
        debug!(items = ranked.len(), "Built popularity ranking");

        Self {
            ranked,
            scale,
            confidence,
        }
    }

    /// Top `n` items overall
    pub fn rank(&self, n: usize) -> Vec<ScoredCandidate> {
        self.rank_excluding(n, &HashSet::new())
    }

    /// Top `n` items, skipping any in `exclude`
    pub fn rank_excluding(&self, n: usize, exclude: &HashSet<ItemId>) -> Vec<ScoredCandidate> {
        self.ranked
            .iter()
            .filter(|item| !exclude.contains(&item.item_id))
            .take(n)
            .map(|item| ScoredCandidate {
                item_id: item.item_id,
                raw_score: item.popularity,
                display_score: self.scale.clamp(item.avg_rating),
                confidence: self.confidence,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}
