//! Errors returned by the recommendation engine.
//!
//! An empty or short result is never an error: `Ok(vec![])` means the user
//! has exhausted the catalog, and a length below `n` means fewer items were
//! available.

use data_loader::UserId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    /// Caller misuse, such as asking for zero results
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No oracle installed, or the oracle call failed
    #[error("Model not loaded: {0}")]
    ModelNotLoaded(String),

    /// Strict personalized ranking was requested for a user outside the
    /// trained population
    #[error("User {0} is not part of the trained model")]
    UnknownUser(UserId),

    /// A candidate filter rejected the request
    #[error("Candidate filter failed: {0}")]
    Filter(String),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
