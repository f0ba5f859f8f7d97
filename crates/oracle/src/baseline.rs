//! Damped-mean baseline backend.
//!
//! Estimates `mu + b_u + b_i` straight from an interaction store:
//!
//! ```text
//! b_i = sum(r - mu) / (lambda_i + n_i)
//! b_u = sum(r - mu - b_i) / (lambda_u + n_u)
//! ```
//!
//! The damping terms shrink biases of sparsely rated items and users
//! towards zero. This needs no trained weights, so it is the backend used
//! when no factor model is supplied.

use crate::calibration::Calibration;
use crate::traits::ScoringOracle;
use crate::Result;
use data_loader::{InteractionStore, ItemId, RatingScale, UserId};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::info;

const DEFAULT_ITEM_DAMPING: f32 = 25.0;
const DEFAULT_USER_DAMPING: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct BaselineOracle {
    global_mean: f32,
    user_bias: HashMap<UserId, f32>,
    item_bias: HashMap<ItemId, f32>,
    bounds: RatingScale,
    calibration: Calibration,
}

impl BaselineOracle {
    pub fn from_store(store: &InteractionStore, bounds: RatingScale) -> Self {
        Self::with_damping(store, bounds, DEFAULT_ITEM_DAMPING, DEFAULT_USER_DAMPING)
    }

    pub fn with_damping(
        store: &InteractionStore,
        bounds: RatingScale,
        item_damping: f32,
        user_damping: f32,
    ) -> Self {
        let global_mean = store.global_mean();

        let item_bias: HashMap<ItemId, f32> = store
            .all_item_stats()
            .collect::<Vec<_>>()
            .par_iter()
            .map(|&(item_id, _)| {
                let ratings = store.item_interactions(item_id);
                let residual: f32 = ratings.iter().map(|r| r.rating - global_mean).sum();
                (item_id, residual / (item_damping + ratings.len() as f32))
            })
            .collect();

        let user_bias: HashMap<UserId, f32> = store
            .user_ids()
            .par_iter()
            .map(|&user_id| {
                let ratings = store.user_interactions(user_id);
                let residual: f32 = ratings
                    .iter()
                    .map(|r| {
                        r.rating - global_mean - item_bias.get(&r.item_id).copied().unwrap_or(0.0)
                    })
                    .sum();
                (user_id, residual / (user_damping + ratings.len() as f32))
            })
            .collect();

        info!(
            users = user_bias.len(),
            items = item_bias.len(),
            global_mean,
            "Built baseline oracle"
        );

        Self {
            global_mean,
            user_bias,
            item_bias,
            bounds,
            calibration: Calibration::Constant(0.7),
        }
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }
}

impl ScoringOracle for BaselineOracle {
    fn name(&self) -> &str {
        "baseline"
    }

    fn is_known_user(&self, user_id: UserId) -> bool {
        self.user_bias.contains_key(&user_id)
    }

    fn predict(&self, user_id: UserId, item_id: ItemId) -> Result<f32> {
        let bu = self.user_bias.get(&user_id).copied().unwrap_or(0.0);
        let bi = self.item_bias.get(&item_id).copied().unwrap_or(0.0);
        Ok(self.global_mean + bu + bi)
    }

    fn score_scale_bounds(&self) -> RatingScale {
        self.bounds
    }

    fn calibration(&self) -> Calibration {
        self.calibration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Interaction;

    fn create_test_store() -> InteractionStore {
        let mut ratings = Vec::new();
        // Item 1 is loved, item 2 is disliked, by many users
        for user_id in 1..=20 {
            ratings.push(Interaction::new(user_id, 1, 5.0));
            ratings.push(Interaction::new(user_id, 2, 2.0));
        }
        // User 100 rates generously
        ratings.push(Interaction::new(100, 3, 5.0));
        InteractionStore::new(ratings)
    }

    #[test]
    fn test_item_bias_orders_items() {
        let store = create_test_store();
        let oracle = BaselineOracle::from_store(&store, RatingScale::default());
        let loved = oracle.predict(1, 1).unwrap();
        let disliked = oracle.predict(1, 2).unwrap();
        assert!(loved > disliked);
    }

    #[test]
    fn test_known_users_come_from_store() {
        let store = create_test_store();
        let oracle = BaselineOracle::from_store(&store, RatingScale::default());
        assert!(oracle.is_known_user(1));
        assert!(oracle.is_known_user(100));
        assert!(!oracle.is_known_user(999));
    }

    #[test]
    fn test_unknown_item_scores_user_baseline() {
        let store = create_test_store();
        let oracle = BaselineOracle::from_store(&store, RatingScale::default());
        let score = oracle.predict(999, 12345).unwrap();
        assert!((score - oracle.global_mean()).abs() < 1e-6);
    }

    #[test]
    fn test_damping_shrinks_single_rating() {
        let store = create_test_store();
        let oracle = BaselineOracle::from_store(&store, RatingScale::default());
        // Item 3 has one 5-star rating; heavily damped towards the mean
        let single = oracle.predict(999, 3).unwrap() - oracle.global_mean();
        assert!(single > 0.0 && single < 0.2);
    }

    #[test]
    fn test_empty_store() {
        let oracle = BaselineOracle::from_store(&InteractionStore::default(), RatingScale::default());
        assert_eq!(oracle.predict(1, 1).unwrap(), 0.0);
        assert!(!oracle.is_known_user(1));
    }
}
