//! Simulation state
//!
//! Artifacts and the culture store that owns them, the shared environment,
//! agents, and the relationship graph between agents.

pub mod agent;
pub mod artifact;
pub mod culture;
pub mod environment;
pub mod social;

pub use agent::*;
pub use artifact::*;
pub use culture::*;
pub use environment::*;
pub use social::*;
