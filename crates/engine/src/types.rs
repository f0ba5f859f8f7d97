//! Output types of the engine.

use data_loader::{Genre, ItemId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A candidate after scoring. Lives for one call only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub item_id: ItemId,
    pub raw_score: f32,
    /// Raw score clamped to the rating domain
    pub display_score: f32,
    pub confidence: f32,
}

/// Which path produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankOrigin {
    Personalized,
    ColdStart,
}

/// One entry of the engine's ordered output, most preferred first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub title: String,
    pub display_score: f32,
    pub confidence: f32,
    pub origin: RankOrigin,
}

/// A past rating joined with its catalog title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub item_id: ItemId,
    pub title: String,
    pub rating: f32,
    pub timestamp: Option<i64>,
}

/// Aggregate view of a user's rating history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: UserId,
    pub rated_count: usize,
    pub avg_rating: f32,
    /// Genre with the most rated items; `None` without ratings
    pub favorite_genre: Option<Genre>,
    /// Counts of ratings rounded to 1..=5 stars, index 0 is one star
    pub rating_histogram: [u32; 5],
    /// Distinct rated items per genre
    pub genre_counts: BTreeMap<Genre, u32>,
}
