//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "cold_start_confidence": 0.4, "min_release_year": 1980 }
//! ```

use anyhow::{Context, Result, ensure};
use data_loader::RatingScale;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rating domain; bounds cold-start display scores
    pub rating_scale: RatingScale,
    /// Confidence attached to every cold-start result
    pub cold_start_confidence: f32,
    /// Degrade to the popularity ranking when the oracle fails
    pub fallback_on_oracle_error: bool,
    /// Missing titles render as "<prefix> <id>"
    pub placeholder_title_prefix: String,
    /// Drop personalized candidates released before this year
    pub min_release_year: Option<u16>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rating_scale: RatingScale::default(),
            cold_start_confidence: 0.5,
            fallback_on_oracle_error: true,
            placeholder_title_prefix: "Movie".to_string(),
            min_release_year: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Parsing engine config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Reading engine config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn with_cold_start_confidence(mut self, confidence: f32) -> Self {
        self.cold_start_confidence = confidence;
        self
    }

    pub fn with_fallback_on_oracle_error(mut self, fallback: bool) -> Self {
        self.fallback_on_oracle_error = fallback;
        self
    }

    pub fn with_min_release_year(mut self, year: Option<u16>) -> Self {
        self.min_release_year = year;
        self
    }

    pub fn with_rating_scale(mut self, scale: RatingScale) -> Self {
        self.rating_scale = scale;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.cold_start_confidence),
            "cold_start_confidence must be in [0, 1], got {}",
            self.cold_start_confidence
        );
        ensure!(
            self.rating_scale.min < self.rating_scale.max,
            "rating_scale min {} must be below max {}",
            self.rating_scale.min,
            self.rating_scale.max
        );
        Ok(())
    }

    pub(crate) fn placeholder_title(&self, item_id: u32) -> String {
        format!("{} {}", self.placeholder_title_prefix, item_id)
    }
}
