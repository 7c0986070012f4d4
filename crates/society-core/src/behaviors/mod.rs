//! Behavioral Modules
//!
//! Stateless strategies agents invoke during their routine. Each one is an
//! explicitly constructed value owned by the world, configured once from
//! [`SocietyConfig`]; all randomness comes from the caller's generator.

pub mod dreams;
pub mod modes;
pub mod reflection;
pub mod revolution;
pub mod roles;
pub mod synthesis;

pub use dreams::DreamEngine;
pub use modes::{AgentMode, ModeParams};
pub use reflection::Reflection;
pub use revolution::{RevolutionDetector, Uprising};
pub use roles::RolePlay;
pub use synthesis::Synthesizer;

use crate::config::SocietyConfig;

/// Every behavioral module a world hands to its agents
#[derive(Debug, Clone)]
pub struct Behaviors {
    pub roles: RolePlay,
    pub revolution: RevolutionDetector,
    pub reflection: Reflection,
    pub dreams: DreamEngine,
    pub synthesis: Synthesizer,
}

impl Behaviors {
    pub fn from_config(config: &SocietyConfig) -> Self {
        Self {
            roles: RolePlay,
            revolution: RevolutionDetector::new(config.lifecycle.revolution_share),
            reflection: Reflection::default(),
            dreams: DreamEngine::new(config.behavior.dream_empathy_gain),
            synthesis: Synthesizer::default(),
        }
    }
}
