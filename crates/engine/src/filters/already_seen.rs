//! Filter to remove items the user has already interacted with.
//!
//! Always the first filter in the engine's pipeline; no recommendation may
//! repeat an observed item.

use crate::context::UserContext;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::ItemId;

/// Removes candidates present in `UserContext::seen_items` (O(1) lookups).
pub struct AlreadySeenFilter;

impl Filter for AlreadySeenFilter {
    fn name(&self) -> &str {
        "AlreadySeenFilter"
    }

    fn apply(&self, candidates: Vec<ItemId>, context: &UserContext) -> Result<Vec<ItemId>> {
        Ok(candidates
            .into_iter()
            .filter(|item_id| !context.seen_items.contains(item_id))
            .collect())
    }
}
