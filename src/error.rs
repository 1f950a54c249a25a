//! Error types for settlement map generation

use thiserror::Error;

use crate::config::GenerationStrategy;

/// Errors that can occur during map generation or queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A town could not be sited within its per-town draw budget
    #[error("could not place town {town} after {attempts} coordinate draws")]
    PlacementFailure {
        /// Index of the town that could not be placed
        town: usize,
        /// Number of draws spent on that town
        attempts: usize,
    },

    /// No valid road network was found within the retry budget
    #[error("road wiring exhausted after {attempts} attempts: {reason}")]
    WiringExhausted {
        /// Outer attempts spent before giving up
        attempts: usize,
        /// Which budget ran out
        reason: String,
    },

    /// The requested generation strategy has no implementation
    #[error("generation strategy {0:?} is not implemented")]
    UnsupportedStrategy(GenerationStrategy),

    /// Requested town ID does not exist
    #[error("town not found: {0}")]
    TownNotFound(usize),
}

/// Result type alias for settlement operations
pub type Result<T> = std::result::Result<T, SettlementError>;
