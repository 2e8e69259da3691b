//! Error taxonomy
//!
//! Two kinds of real failures exist: wiring problems at startup (fatal) and
//! storage problems (degraded, never fatal). Rejected gameplay operations
//! (shooting while the ball moves, starting a locked level) are ordinary
//! no-op outcomes, not errors.

use thiserror::Error;

/// Fatal configuration problem detected while assembling the game.
///
/// Gameplay cannot function without its collaborators, so these refuse
/// construction instead of being worked around.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required collaborator was never supplied to the builder
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// The level catalog contains no levels
    #[error("level catalog is empty")]
    EmptyCatalog,
}

/// Storage failure while loading or saving the progress record.
///
/// Reads fall back to defaults for the session; writes are reported and
/// gameplay continues.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed progress record: {0}")]
    Format(#[from] serde_json::Error),
}
