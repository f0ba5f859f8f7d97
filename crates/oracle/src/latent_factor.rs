//! Latent-factor backend.
//!
//! Prediction follows the biased matrix-factorization form
//!
//! ```text
//! r(u, i) = mu + b_u + b_i + p_u . q_i
//! ```
//!
//! A plain dot-product model is the special case with `mu = 0` and no
//! biases. Unknown items fall back to `mu + b_u`; unknown users to
//! `mu + b_i`. The parameters come from an external trainer; this type only
//! holds and evaluates them.

use crate::calibration::Calibration;
use crate::traits::ScoringOracle;
use crate::{OracleError, Result};
use data_loader::{ItemId, RatingScale, UserId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Below this many items a batch is scored on the calling thread
const PARALLEL_BATCH_THRESHOLD: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Factors {
    vector: Vec<f32>,
    bias: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatentFactorOracle {
    dimensions: usize,
    global_mean: f32,
    users: HashMap<UserId, Factors>,
    items: HashMap<ItemId, Factors>,
    bounds: RatingScale,
    calibration: Calibration,
}

impl LatentFactorOracle {
    /// Create an empty model with `dimensions` latent factors.
    ///
    /// Confidence defaults to a sigmoid centred on the scale midpoint.
    pub fn new(dimensions: usize, bounds: RatingScale) -> Self {
        Self {
            dimensions,
            global_mean: 0.0,
            users: HashMap::new(),
            items: HashMap::new(),
            bounds,
            calibration: Calibration::Sigmoid {
                center: bounds.midpoint(),
                steepness: 1.5,
            },
        }
    }

    pub fn with_global_mean(mut self, global_mean: f32) -> Self {
        self.global_mean = global_mean;
        self
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn insert_user(&mut self, user_id: UserId, vector: Vec<f32>, bias: f32) -> Result<()> {
        self.check_dimensions("user", user_id, &vector)?;
        self.users.insert(user_id, Factors { vector, bias });
        Ok(())
    }

    pub fn insert_item(&mut self, item_id: ItemId, vector: Vec<f32>, bias: f32) -> Result<()> {
        self.check_dimensions("item", item_id, &vector)?;
        self.items.insert(item_id, Factors { vector, bias });
        Ok(())
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// (known users, known items)
    pub fn counts(&self) -> (usize, usize) {
        (self.users.len(), self.items.len())
    }

    fn check_dimensions(&self, entity: &'static str, id: u32, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(OracleError::DimensionMismatch {
                entity,
                id,
                expected: self.dimensions,
                found: vector.len(),
            });
        }
        Ok(())
    }

    fn score(&self, user: Option<&Factors>, item_id: ItemId) -> f32 {
        let item = self.items.get(&item_id);
        let mut score = self.global_mean;
        if let Some(user) = user {
            score += user.bias;
        }
        if let Some(item) = item {
            score += item.bias;
        }
        if let (Some(user), Some(item)) = (user, item) {
            score += dot(&user.vector, &item.vector);
        }
        score
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl ScoringOracle for LatentFactorOracle {
    fn name(&self) -> &str {
        "latent-factor"
    }

    fn is_known_user(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id)
    }

    fn predict(&self, user_id: UserId, item_id: ItemId) -> Result<f32> {
        Ok(self.score(self.users.get(&user_id), item_id))
    }

    #[instrument(skip(self, item_ids), fields(batch = item_ids.len()))]
    fn predict_batch(&self, user_id: UserId, item_ids: &[ItemId]) -> Result<Vec<f32>> {
        let user = self.users.get(&user_id);
        let scores = if item_ids.len() >= PARALLEL_BATCH_THRESHOLD {
            item_ids.par_iter().map(|&id| self.score(user, id)).collect()
        } else {
            item_ids.iter().map(|&id| self.score(user, id)).collect()
        };
        debug!("Scored {} items", item_ids.len());
        Ok(scores)
    }

    fn score_scale_bounds(&self) -> RatingScale {
        self.bounds
    }

    fn calibration(&self) -> Calibration {
        self.calibration
    }
}
