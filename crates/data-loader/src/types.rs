//! Core domain types shared by every crate in the workspace.
//!
//! Identifiers are plain type aliases; the interesting structure lives in
//! [`crate::Catalog`] and [`crate::InteractionStore`].

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque identifier for a user
pub type UserId = u32;

/// Opaque identifier for a recommendable item (a movie in MovieLens)
pub type ItemId = u32;

// =============================================================================
// Interactions
// =============================================================================

/// A single observed rating from a user for an item.
///
/// Interactions are immutable once loaded. The same (user, item) pair may
/// appear more than once; every observation counts towards item statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Rating value, bounded by the dataset's [`RatingScale`]
    pub rating: f32,
    /// Unix timestamp when the rating was made, if the source recorded one
    pub timestamp: Option<i64>,
}

impl Interaction {
    pub fn new(user_id: UserId, item_id: ItemId, rating: f32) -> Self {
        Self {
            user_id,
            item_id,
            rating,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Inclusive bounds of the rating domain, `[1, 5]` for MovieLens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f32,
    pub max: f32,
}

impl RatingScale {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the scale. NaN maps to the lower bound so that
    /// downstream ordering stays total. Never panics, even on an inverted
    /// scale; check [`RatingScale::is_ordered`] where bounds are untrusted.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.max(self.min).min(self.max)
        }
    }

    /// Both bounds are numbers and `min <= max`
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn midpoint(&self) -> f32 {
        (self.min + self.max) / 2.0
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self::new(1.0, 5.0)
    }
}

// =============================================================================
// Catalog Types
// =============================================================================

/// Display metadata for a recommendable item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Release year, from the title suffix ("Toy Story (1995)") or the
    /// release-date column when the title has none
    pub year: Option<u16>,
    /// Feature tags
    pub genres: Vec<Genre>,
}

/// MovieLens genres. `Unknown` only appears in the 100k dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Genre {
    Unknown,
    Action,
    Adventure,
    Animation,
    Children,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Fantasy,
    FilmNoir,
    Horror,
    Musical,
    Mystery,
    Romance,
    SciFi,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// Column order of the genre flags in `u.item`
    pub const ML100K_COLUMNS: [Genre; 19] = [
        Genre::Unknown,
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Children,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Fantasy,
        Genre::FilmNoir,
        Genre::Horror,
        Genre::Musical,
        Genre::Mystery,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Aggregate rating statistics for an item, computed once per store
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    pub avg_rating: f32,
    pub rating_count: u32,
    /// `avg_rating * ln(1 + rating_count)`
    pub popularity_score: f32,
}

impl ItemStats {
    pub fn from_ratings(ratings: impl IntoIterator<Item = f32>) -> Self {
        let (total, count) = ratings
            .into_iter()
            .fold((0.0f64, 0u32), |(sum, n), r| (sum + r as f64, n + 1));
        let avg_rating = if count > 0 {
            (total / count as f64) as f32
        } else {
            0.0
        };
        Self {
            avg_rating,
            rating_count: count,
            popularity_score: popularity_score(avg_rating, count),
        }
    }
}

/// Popularity used for the cold-start ranking.
///
/// The log dampens the count so a handful of perfect ratings cannot beat a
/// broadly well-liked item, while volume still counts.
pub fn popularity_score(avg_rating: f32, rating_count: u32) -> f32 {
    avg_rating * (rating_count as f32 + 1.0).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popularity_score() {
        // 4.5 average over 10 ratings vs 3.5 over 1000
        let few = popularity_score(4.5, 10);
        let many = popularity_score(3.5, 1000);
        assert!(many > few);

        // Five perfect ratings lose to a broadly liked item
        assert!(popularity_score(5.0, 5) < popularity_score(4.0, 2000));
    }

    #[test]
    fn test_item_stats_from_ratings() {
        let stats = ItemStats::from_ratings([5.0, 4.0, 5.0]);
        assert_eq!(stats.rating_count, 3);
        assert!((stats.avg_rating - 4.6667).abs() < 1e-3);
        assert!((stats.popularity_score - 6.4694).abs() < 1e-2);
    }

    #[test]
    fn test_rating_scale_clamp() {
        let scale = RatingScale::default();
        assert_eq!(scale.clamp(6.2), 5.0);
        assert_eq!(scale.clamp(-1.0), 1.0);
        assert_eq!(scale.clamp(3.3), 3.3);
        assert_eq!(scale.clamp(f32::NAN), 1.0);
        assert_eq!(scale.midpoint(), 3.0);
    }

    #[test]
    fn test_inverted_scale_does_not_panic() {
        let inverted = RatingScale::new(5.0, 1.0);
        assert!(!inverted.is_ordered());
        assert!(!RatingScale::new(f32::NAN, 5.0).is_ordered());
        assert!(RatingScale::default().is_ordered());

        assert_eq!(inverted.clamp(3.0), 1.0);
        assert_eq!(RatingScale::new(1.0, f32::NAN).clamp(3.0), 3.0);
    }
}
