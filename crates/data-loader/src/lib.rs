//! # Data Loader Crate
//!
//! Loads and indexes the MovieLens interaction log and item catalog.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (UserId, ItemId, Interaction, Item, ItemStats)
//! - **catalog**: Read-only item metadata with genre/year indices
//! - **store**: Read-only interaction store with per-user and per-item indices
//! - **parser**: Parse the 100k and 1M file layouts
//! - **dataset**: Load, index and validate a whole directory
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_dir(Path::new("data/ml-100k"))?;
//! let seen = dataset.interactions.seen_items(1);
//! let title = dataset.catalog.title(242);
//! ```

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod parser;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use catalog::Catalog;
pub use dataset::Dataset;
pub use error::{DataLoadError, Result};
pub use parser::DatasetLayout;
pub use store::InteractionStore;
pub use types::{
    popularity_score, Genre, Interaction, Item, ItemId, ItemStats, RatingScale, UserId,
};
