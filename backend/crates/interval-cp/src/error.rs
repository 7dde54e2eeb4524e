//! Error types for interval-cp

use thiserror::Error;

/// Result type for interval-cp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or solving a model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A domain whose lower bound exceeds its upper bound
    #[error("Invalid domain [{lb}, {ub}]")]
    InvalidDomain { lb: i64, ub: i64 },

    /// A variable handle that does not belong to the model
    #[error("Unknown {kind} variable #{index}")]
    UnknownVariable { kind: &'static str, index: usize },

    /// Interval with a negative size
    #[error("Interval '{name}' has negative size {size}")]
    NegativeSize { name: String, size: i64 },

    /// The model uses a construct the engine cannot handle
    #[error("Unsupported model: {0}")]
    Unsupported(String),
}
