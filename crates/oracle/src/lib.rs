//! Scoring oracles: the boundary between the recommendation engine and
//! whatever model produces predicted ratings.
//!
//! The engine only ever talks to [`ScoringOracle`]. Backends in this crate:
//! - [`LatentFactorOracle`]: biased matrix-factorization prediction
//!   (`mu + b_u + b_i + p_u . q_i`), plain dot product when mean and biases
//!   are zero
//! - [`BaselineOracle`]: damped user/item mean baseline estimated from an
//!   interaction store
//!
//! Any other predictor can be plugged in by implementing the trait.

use thiserror::Error;

pub mod baseline;
pub mod calibration;
pub mod latent_factor;
pub mod traits;

pub use baseline::BaselineOracle;
pub use calibration::Calibration;
pub use latent_factor::LatentFactorOracle;
pub use traits::ScoringOracle;

/// Errors an oracle may report for a whole call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Scoring oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Factor vector for {entity} {id} has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        entity: &'static str,
        id: u32,
        expected: usize,
        found: usize,
    },

    #[error("Invalid response from scoring oracle: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, OracleError>;
