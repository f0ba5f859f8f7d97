//! Filter to drop items released before a given year.

use crate::context::UserContext;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::{Catalog, ItemId};
use std::collections::HashSet;

/// Keeps candidates released in or after `min_year`.
///
/// Items without a known release year are dropped, since they cannot be
/// shown to satisfy the floor.
pub struct ReleaseYearFilter {
    /// Resolved once from the catalog's year index
    allowed: HashSet<ItemId>,
}

impl ReleaseYearFilter {
    pub fn new(catalog: &Catalog, min_year: u16) -> Self {
        Self {
            allowed: catalog
                .items_in_year_range(min_year, u16::MAX)
                .into_iter()
                .collect(),
        }
    }
}

impl Filter for ReleaseYearFilter {
    fn name(&self) -> &str {
        "ReleaseYearFilter"
    }

    fn apply(&self, candidates: Vec<ItemId>, _context: &UserContext) -> Result<Vec<ItemId>> {
        Ok(candidates
            .into_iter()
            .filter(|item_id| self.allowed.contains(item_id))
            .collect())
    }
}
