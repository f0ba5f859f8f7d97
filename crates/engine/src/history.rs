//! User history and profile summaries for display.

use crate::config::EngineConfig;
use crate::types::{HistoryEntry, UserSummary};
use data_loader::{Catalog, Genre, InteractionStore, UserId};
use std::collections::{BTreeMap, HashSet};

/// Past ratings, highest rating first, ties by item id
pub fn user_history(
    store: &InteractionStore,
    catalog: &Catalog,
    config: &EngineConfig,
    user_id: UserId,
) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = store
        .user_interactions(user_id)
        .iter()
        .map(|interaction| HistoryEntry {
            item_id: interaction.item_id,
            title: catalog
                .title(interaction.item_id)
                .map(str::to_string)
                .unwrap_or_else(|| config.placeholder_title(interaction.item_id)),
            rating: interaction.rating,
            timestamp: interaction.timestamp,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then_with(|| a.item_id.cmp(&b.item_id))
    });
    entries
}

/// Rated count, average, star histogram and genre breakdown.
///
/// Genre counts cover distinct items and skip `Genre::Unknown`. The
/// favorite genre is the most counted one; ties go to the genre that sorts
/// first.
pub fn user_summary(
    store: &InteractionStore,
    catalog: &Catalog,
    config: &EngineConfig,
    user_id: UserId,
) -> UserSummary {
    let ratings = store.user_interactions(user_id);
    let scale = config.rating_scale;

    let mut rating_histogram = [0u32; 5];
    for interaction in ratings {
        let stars = scale.clamp(interaction.rating).round().clamp(1.0, 5.0) as usize;
        rating_histogram[stars - 1] += 1;
    }

    let avg_rating = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().map(|r| r.rating).sum::<f32>() / ratings.len() as f32
    };

    let distinct: HashSet<_> = ratings.iter().map(|r| r.item_id).collect();
    let mut genre_counts: BTreeMap<Genre, u32> = BTreeMap::new();
    for item in distinct.iter().filter_map(|&id| catalog.get(id)) {
        for &genre in item.genres.iter().filter(|&&g| g != Genre::Unknown) {
            *genre_counts.entry(genre).or_default() += 1;
        }
    }

    // BTreeMap iterates in genre order; keep the first maximum
    let favorite_genre = genre_counts
        .iter()
        .fold(None, |best: Option<(Genre, u32)>, (&genre, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((genre, count)),
        })
        .map(|(genre, _)| genre);

    UserSummary {
        user_id,
        rated_count: ratings.len(),
        avg_rating,
        favorite_genre,
        rating_histogram,
        genre_counts,
    }
}
