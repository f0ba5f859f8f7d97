//! Raw score to confidence mapping.

use serde::{Deserialize, Serialize};

/// A backend's declared confidence calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Calibration {
    /// Same confidence for every score; for backends without uncertainty
    Constant(f32),
    /// `1 / (1 + exp(-steepness * (raw - center)))`
    Sigmoid { center: f32, steepness: f32 },
}

impl Calibration {
    /// Confidence in `[0, 1]`. A NaN raw score has zero confidence.
    pub fn confidence(&self, raw_score: f32) -> f32 {
        if raw_score.is_nan() {
            return 0.0;
        }
        let value = match *self {
            Calibration::Constant(c) => c,
            Calibration::Sigmoid { center, steepness } => {
                1.0 / (1.0 + (-steepness * (raw_score - center)).exp())
            }
        };
        if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
    }
}
