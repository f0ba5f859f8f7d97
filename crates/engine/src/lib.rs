//! Recommendation engine: ranks unseen items for a user.
//!
//! This crate provides:
//! - RecommendationEngine, the request entry point
//! - Filter trait and FilterPipeline for candidate narrowing
//! - PopularityRanker for the cold-start path
//! - History and profile summaries for display
//!
//! ## Architecture
//! A request flows through these stages:
//! 1. The oracle decides whether the user is known; unknown users go to cold start
//! 2. Filters remove seen items (and anything else configured) from the catalog
//! 3. The oracle scores the remaining candidates in one batch
//! 4. Scores are clamped, calibrated, ranked and truncated
//!
//! ## Example Usage
//! ```ignore
//! use engine::{EngineConfig, RecommendationEngine};
//! use oracle::BaselineOracle;
//!
//! let oracle = BaselineOracle::from_store(&store, dataset.scale);
//! let engine = RecommendationEngine::new(store, catalog, Some(Arc::new(oracle)), EngineConfig::default())?;
//! let recs = engine.recommend(42, 10)?;
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod history;
pub mod popularity;
pub mod ranking;
pub mod scoring;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::EngineConfig;
pub use context::{UserContext, build_user_context};
pub use engine::RecommendationEngine;
pub use error::{RecommendError, Result};
pub use filter_pipeline::FilterPipeline;
pub use popularity::PopularityRanker;
pub use traits::Filter;
pub use types::{HistoryEntry, RankOrigin, Recommendation, ScoredCandidate, UserSummary};
