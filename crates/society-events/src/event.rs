//! Event Types
//!
//! Everything notable that happens during a tick is recorded as a
//! [`SocietyEvent`]. Events are append-only and carry the tick they occurred on.

use serde::{Deserialize, Serialize};

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

/// A single entry in the event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocietyEvent {
    pub event_id: String,
    pub tick: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventKind {
    /// An agent created a new artifact
    ArtifactCreated {
        artifact_id: u64,
        author_id: String,
        content: String,
    },
    /// Two artifacts were combined into a hybrid
    ArtifactSynthesized {
        artifact_id: u64,
        author_id: String,
        content: String,
        parents: [u64; 2],
    },
    /// An artifact arrived from outside the simulation
    ArtifactInjected {
        artifact_id: u64,
        content: String,
        recipient: Option<String>,
    },
    /// Popularity fell to the forget threshold and the store dropped it
    ArtifactForgotten { artifact_id: u64, content: String },
    /// An agent authored a rule on its own
    RuleAuthored { author_id: String, rule: String },
    /// An artifact is carried by most of the living population
    Revolution {
        content: String,
        carriers: usize,
        population: usize,
    },
    /// The environment produced a named event
    EnvironmentShift { event: String },
    /// An agent took on a social role
    RoleAssigned { agent_id: String, role: String },
    /// An agent was born through inheritance
    AgentBorn {
        agent_id: String,
        parent_id: String,
        generation: u32,
    },
    /// An agent was removed from the population
    AgentRemoved { agent_id: String, age: u64 },
}

impl EventKind {
    /// Short, stable name for the variant.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::ArtifactCreated { .. } => "artifact_created",
            EventKind::ArtifactSynthesized { .. } => "artifact_synthesized",
            EventKind::ArtifactInjected { .. } => "artifact_injected",
            EventKind::ArtifactForgotten { .. } => "artifact_forgotten",
            EventKind::RuleAuthored { .. } => "rule_authored",
            EventKind::Revolution { .. } => "revolution",
            EventKind::EnvironmentShift { .. } => "environment_shift",
            EventKind::RoleAssigned { .. } => "role_assigned",
            EventKind::AgentBorn { .. } => "agent_born",
            EventKind::AgentRemoved { .. } => "agent_removed",
        }
    }
}
