//! Error types for Costwise.

use thiserror::Error;

/// Result type alias using Costwise's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the tradeoff analysis engine.
///
/// Violated constraints are never an error: they are reported as data in
/// the analysis output and feed the `constraint_violation` recommendation.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input reaching the engine boundary (bad weights, records
    /// missing the scope key). The whole call fails.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Fewer records or groups than the requested analysis needs. Raised
    /// only for an empty batch; per-section insufficiency degrades to an
    /// omitted section instead.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Unexpected internal invariant violation, e.g. a score that came out
    /// non-finite despite the guards.
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an insufficient data error.
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Self::InsufficientData(msg.into())
    }

    /// Create an analysis failure error.
    pub fn analysis_failed(msg: impl Into<String>) -> Self {
        Self::AnalysisFailed(msg.into())
    }
}
