//! Server crate for the ReelRecs recommendation engine.
//!
//! This crate wraps the engine for async callers:
//! - `provider`: loads a dataset and builds the selected oracle backend
//! - `service`: holds the current engine, swaps it atomically on reload and
//!   runs a bounded number of requests on the blocking pool
//! - `watchlist`: caller-owned per-user lists the engine never reads

pub mod provider;
pub mod service;
pub mod watchlist;

pub use provider::{DatasetProvider, ModelProvider, ModelSnapshot, OracleBackend, ProviderError};
pub use service::{DEFAULT_MAX_IN_FLIGHT_SCORING, RecommendationService, ServiceError};
pub use watchlist::Watchlist;
