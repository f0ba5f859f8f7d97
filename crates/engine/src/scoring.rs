//! Adapts raw oracle scores into display scores and confidences.

use crate::types::ScoredCandidate;
use data_loader::{ItemId, UserId};
use oracle::{OracleError, ScoringOracle};
use tracing::debug;

/// Score every candidate with a single batch call.
///
/// Display scores are clamped to the oracle's declared bounds; confidence
/// comes from the oracle's calibration. A response whose length differs
/// from the request, or unordered bounds, are rejected.
pub fn score_candidates(
    oracle: &dyn ScoringOracle,
    user_id: UserId,
    candidates: &[ItemId],
) -> Result<Vec<ScoredCandidate>, OracleError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let raw_scores = oracle.predict_batch(user_id, candidates)?;
    if raw_scores.len() != candidates.len() {
        return Err(OracleError::InvalidResponse(format!(
            "{} returned {} scores for {} items",
            oracle.name(),
            raw_scores.len(),
            candidates.len()
        )));
    }

    let bounds = oracle.score_scale_bounds();
    if !bounds.is_ordered() {
        return Err(OracleError::InvalidResponse(format!(
            "{} reported invalid score bounds [{}, {}]",
            oracle.name(),
            bounds.min,
            bounds.max
        )));
    }
    let calibration = oracle.calibration();
    debug!(
        oracle = oracle.name(),
        candidates = candidates.len(),
        "Scored candidate batch"
    );

    Ok(candidates
        .iter()
        .zip(raw_scores)
        .map(|(&item_id, raw_score)| ScoredCandidate {
            item_id,
            raw_score,
            display_score: bounds.clamp(raw_score),
            confidence: calibration.confidence(raw_score),
        })
        .collect())
}
