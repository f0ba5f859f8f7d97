//! The capability every model backend must provide.

use crate::calibration::Calibration;
use crate::Result;
use data_loader::{ItemId, RatingScale, UserId};

/// A trained model that predicts a scalar affinity for (user, item).
///
/// ## Contract
/// - `predict_batch` returns one score per input item, in input order
/// - items outside the trained item space are scored with the backend's own
///   baseline, never reported as an error
/// - `Send + Sync` so one oracle can serve concurrent requests without locks
pub trait ScoringOracle: Send + Sync {
    /// Returns the name of this backend (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether the user belongs to the trained population
    fn is_known_user(&self, user_id: UserId) -> bool;

    /// Predict a single (user, item) score
    fn predict(&self, user_id: UserId, item_id: ItemId) -> Result<f32>;

    /// Predict scores for many items at once.
    ///
    /// The default loops over [`ScoringOracle::predict`]; backends that can
    /// vectorize or parallelize should override it.
    fn predict_batch(&self, user_id: UserId, item_ids: &[ItemId]) -> Result<Vec<f32>> {
        item_ids
            .iter()
            .map(|&item_id| self.predict(user_id, item_id))
            .collect()
    }

    /// Native score range, used to clamp display scores
    fn score_scale_bounds(&self) -> RatingScale;

    /// How raw scores map to a confidence in `[0, 1]`
    fn calibration(&self) -> Calibration {
        Calibration::Constant(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OracleError;

    /// Only implements single-item prediction
    struct EchoOracle;

    impl ScoringOracle for EchoOracle {
        fn name(&self) -> &str {
            "echo"
        }

        fn is_known_user(&self, user_id: UserId) -> bool {
            user_id == 1
        }

        fn predict(&self, _user_id: UserId, item_id: ItemId) -> Result<f32> {
            if item_id == 0 {
                return Err(OracleError::Unavailable("item zero".to_string()));
            }
            Ok(item_id as f32 / 10.0)
        }

        fn score_scale_bounds(&self) -> RatingScale {
            RatingScale::default()
        }
    }

    #[test]
    fn test_default_batch_preserves_order() {
        let scores = EchoOracle.predict_batch(1, &[30, 10, 20]).unwrap();
        assert_eq!(scores, vec![3.0, 1.0, 2.0]);
        assert!(EchoOracle.predict_batch(1, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_default_batch_propagates_failure() {
        assert!(EchoOracle.predict_batch(1, &[10, 0]).is_err());
    }

    #[test]
    fn test_default_calibration_is_constant() {
        assert_eq!(EchoOracle.calibration(), Calibration::Constant(1.0));
    }
}
