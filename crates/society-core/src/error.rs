//! Error types for the society simulation.
//!
//! Nothing here is fatal: the control surface turns every variant into a
//! structured error response and the world stays steppable.

use crate::config::ConfigError;

/// Errors that can occur while driving or persisting a society.
#[derive(Debug, thiserror::Error)]
pub enum SocietyError {
    /// Referenced an agent that is not in the population.
    #[error("agent not found")]
    AgentNotFound(String),

    /// A persisted document parsed but does not describe a valid world.
    #[error("malformed state: {0}")]
    MalformedState(String),

    /// A persisted document was written by an incompatible format version.
    #[error("unsupported save format version {0}")]
    UnsupportedVersion(u32),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, SocietyError>;
