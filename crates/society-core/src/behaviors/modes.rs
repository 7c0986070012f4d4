//! Parenting modes that reshape an agent's learning weights.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::components::agent::Agent;

pub const EXPLORATION: &str = "exploration";
pub const DISCIPLINE: &str = "discipline";
pub const EMPATHY_WEIGHT: &str = "empathy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentMode {
    Chaotic,
    Loving,
    Strict,
    Balanced,
}

/// Learning weights a mode resolves to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeParams {
    pub exploration: f32,
    pub discipline: f32,
    pub empathy: f32,
}

impl AgentMode {
    /// Resolve a mode by name; anything unrecognised is balanced
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "chaotic" => AgentMode::Chaotic,
            "loving" => AgentMode::Loving,
            "strict" => AgentMode::Strict,
            _ => AgentMode::Balanced,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentMode::Chaotic => "chaotic",
            AgentMode::Loving => "loving",
            AgentMode::Strict => "strict",
            AgentMode::Balanced => "balanced",
        }
    }

    pub fn params(&self) -> ModeParams {
        match self {
            AgentMode::Chaotic => ModeParams {
                exploration: 1.0,
                discipline: 0.1,
                empathy: 0.2,
            },
            AgentMode::Loving => ModeParams {
                exploration: 0.5,
                discipline: 0.2,
                empathy: 1.0,
            },
            AgentMode::Strict => ModeParams {
                exploration: 0.2,
                discipline: 1.0,
                empathy: 0.3,
            },
            AgentMode::Balanced => ModeParams {
                exploration: 0.5,
                discipline: 0.5,
                empathy: 0.5,
            },
        }
    }

    /// Write this mode's weights into the agent's skills
    pub fn apply(&self, agent: &mut Agent) -> ModeParams {
        let params = self.params();
        agent.skills.insert(EXPLORATION.to_string(), params.exploration);
        agent.skills.insert(DISCIPLINE.to_string(), params.discipline);
        agent.skills.insert(EMPATHY_WEIGHT.to_string(), params.empathy);
        agent.mode = Some(*self);
        params
    }
}

impl fmt::Display for AgentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
