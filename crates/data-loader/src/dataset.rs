//! Loading a complete dataset snapshot from disk.
//!
//! A [`Dataset`] pairs the interaction log with the catalog it refers to.
//! Loading parses both files in parallel, builds the indices, and validates
//! the ratings against the scale before anything is handed out.

use crate::catalog::Catalog;
use crate::error::{DataLoadError, Result};
use crate::parser::{self, DatasetLayout};
use crate::store::InteractionStore;
use crate::types::RatingScale;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Dataset {
    pub catalog: Catalog,
    pub interactions: InteractionStore,
    pub scale: RatingScale,
}

impl Dataset {
    pub fn new(catalog: Catalog, interactions: InteractionStore, scale: RatingScale) -> Self {
        Self {
            catalog,
            interactions,
            scale,
        }
    }

    /// Load a MovieLens directory, detecting the 100k or 1M layout
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let layout = DatasetLayout::detect(data_dir).ok_or_else(|| DataLoadError::UnknownLayout {
            path: data_dir.display().to_string(),
        })?;
        Self::load_with_layout(data_dir, layout, RatingScale::default())
    }

    pub fn load_with_layout(data_dir: &Path, layout: DatasetLayout, scale: RatingScale) -> Result<Self> {
        info!(?layout, "Loading MovieLens dataset from {}", data_dir.display());

        let ratings_path = data_dir.join(layout.ratings_file());
        let items_path = data_dir.join(layout.items_file());

        // Parse both files in parallel
        let (items, ratings) = rayon::join(
            || parser::parse_items(&items_path, layout),
            || parser::parse_ratings(&ratings_path, layout),
        );
        let items = items?;
        let ratings = ratings?;

        info!("Parsed {} items, {} ratings", items.len(), ratings.len());

        let dataset = Self::new(Catalog::new(items), InteractionStore::new(ratings), scale);
        dataset.validate()?;

        let (users, rated_items, interactions) = dataset.interactions.counts();
        info!(
            users,
            rated_items,
            interactions,
            catalog_items = dataset.catalog.len(),
            "Dataset loaded and validated"
        );
        Ok(dataset)
    }

    /// Validate data integrity
    ///
    /// Out-of-scale ratings and an empty catalog fail the load. Ratings for
    /// items missing from the catalog are tolerated (they still count for
    /// popularity and render with a placeholder title) but are logged.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.is_empty() {
            return Err(DataLoadError::ValidationError("catalog is empty".to_string()));
        }
        self.interactions.validate(&self.scale)?;

        let dangling = self
            .interactions
            .all_item_stats()
            .filter(|(id, _)| !self.catalog.contains(*id))
            .count();
        if dangling > 0 {
            warn!(dangling, "Rated items missing from the catalog");
        }
        Ok(())
    }
}
