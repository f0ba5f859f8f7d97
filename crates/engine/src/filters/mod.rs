//! Filter implementations for candidate generation.

pub mod already_seen;
pub mod release_year;

// Re-export for convenience
pub use already_seen::AlreadySeenFilter;
pub use release_year::ReleaseYearFilter;
