//! In-memory interaction store.
//!
//! Holds every observed (user, item, rating) triple, indexed twice:
//! - by user, for "what has this user rated?"
//! - by item, for aggregate statistics
//!
//! Item statistics are computed once at construction (in parallel with
//! rayon) so the popularity ranking can be rebuilt cheaply from the store
//! alone.

use crate::error::{DataLoadError, Result};
use crate::types::{Interaction, ItemId, ItemStats, RatingScale, UserId};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct InteractionStore {
    user_interactions: HashMap<UserId, Vec<Interaction>>,
    item_interactions: HashMap<ItemId, Vec<Interaction>>,
    item_stats: HashMap<ItemId, ItemStats>,
    total: usize,
}

impl InteractionStore {
    /// Index a batch of interactions and precompute item statistics
    pub fn new(interactions: impl IntoIterator<Item = Interaction>) -> Self {
        let mut user_interactions: HashMap<UserId, Vec<Interaction>> = HashMap::new();
        let mut item_interactions: HashMap<ItemId, Vec<Interaction>> = HashMap::new();
        let mut total = 0;

        for interaction in interactions {
            user_interactions
                .entry(interaction.user_id)
                .or_default()
                .push(interaction);
            item_interactions
                .entry(interaction.item_id)
                .or_default()
                .push(interaction);
            total += 1;
        }

        let item_stats = item_interactions
            .par_iter()
            .map(|(&item_id, ratings)| {
                (item_id, ItemStats::from_ratings(ratings.iter().map(|r| r.rating)))
            })
            .collect();

        Self {
            user_interactions,
            item_interactions,
            item_stats,
            total,
        }
    }

    /// All interactions recorded for a user, in load order
    pub fn user_interactions(&self, user_id: UserId) -> &[Interaction] {
        self.user_interactions
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All interactions recorded for an item, in load order
    pub fn item_interactions(&self, item_id: ItemId) -> &[Interaction] {
        self.item_interactions
            .get(&item_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct items the user has interacted with
    pub fn seen_items(&self, user_id: UserId) -> HashSet<ItemId> {
        self.user_interactions(user_id)
            .iter()
            .map(|r| r.item_id)
            .collect()
    }

    pub fn has_rated(&self, user_id: UserId, item_id: ItemId) -> bool {
        self.user_interactions(user_id)
            .iter()
            .any(|r| r.item_id == item_id)
    }

    pub fn item_stats(&self, item_id: ItemId) -> Option<&ItemStats> {
        self.item_stats.get(&item_id)
    }

    /// Statistics for every item with at least one interaction
    pub fn all_item_stats(&self) -> impl Iterator<Item = (ItemId, &ItemStats)> {
        self.item_stats.iter().map(|(&id, stats)| (id, stats))
    }

    /// Every user with at least one interaction, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.user_interactions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.user_interactions.values().flatten()
    }

    /// Mean over all ratings, 0.0 for an empty store
    pub fn global_mean(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        let sum: f64 = self.iter().map(|r| r.rating as f64).sum();
        (sum / self.total as f64) as f32
    }

    /// (users, items, interactions)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.user_interactions.len(),
            self.item_interactions.len(),
            self.total,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Check every rating lies inside the scale
    pub fn validate(&self, scale: &RatingScale) -> Result<()> {
        match self.iter().find(|r| !scale.contains(r.rating)) {
            Some(bad) => Err(DataLoadError::InvalidValue {
                field: "rating".to_string(),
                value: format!(
                    "{} (user {}, item {})",
                    bad.rating, bad.user_id, bad.item_id
                ),
            }),
            None => Ok(()),
        }
    }
}
