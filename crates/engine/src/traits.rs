//! Core trait for candidate filtering.

use crate::context::UserContext;
use anyhow::Result;
use data_loader::ItemId;

/// Narrows the candidate set before scoring.
///
/// ## Design Note
/// - `Send + Sync` so one engine can serve concurrent requests
/// - Filters take ownership of the candidate list and return the survivors,
///   keeping their relative order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    fn apply(&self, candidates: Vec<ItemId>, context: &UserContext) -> Result<Vec<ItemId>>;
}
