//! Errors raised by the growth algorithms

use crate::graph::GraphError;
use crate::oracle::OracleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("Unrecognized enhancement type: {0} (expected uniqueness or certainty)")]
    UnrecognizedEnhancementType(String),

    #[error("Unrecognized {field}: {value}")]
    UnrecognizedRebuttalKind { field: &'static str, value: String },

    #[error("Malformed rebuttal item: {0}")]
    MalformedRebuttal(String),

    #[error("Malformed enhancement action: {0}")]
    MalformedAction(String),

    #[error("Rebuttal target not in graph: {0}")]
    UnresolvedRebuttalTarget(String),
}

/// Result type for algorithm runs
pub type EngineResult<T> = Result<T, EngineError>;
