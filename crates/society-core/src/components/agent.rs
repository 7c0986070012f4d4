//! Agent Components
//!
//! Per-agent state: lineage, memory, emotions, diary, carried artifacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::artifact::ArtifactHandle;
use crate::behaviors::modes::AgentMode;

pub const JOY: &str = "joy";
pub const SADNESS: &str = "sadness";
pub const EMPATHY: &str = "empathy";

/// Value an emotion takes when an agent has never felt it
pub const NEUTRAL_EMOTION: f32 = 0.5;

/// Named emotions, each 0.0 to 1.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Emotions(BTreeMap<String, f32>);

impl Default for Emotions {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert(JOY.to_string(), NEUTRAL_EMOTION);
        map.insert(SADNESS.to_string(), NEUTRAL_EMOTION);
        Self(map)
    }
}

impl Emotions {
    pub fn get(&self, name: &str) -> Option<f32> {
        self.0.get(name).copied()
    }

    /// The emotion's level, or neutral if the agent has never felt it
    pub fn level(&self, name: &str) -> f32 {
        self.get(name).unwrap_or(NEUTRAL_EMOTION)
    }

    pub fn set(&mut self, name: &str, value: f32) {
        self.0.insert(name.to_string(), value.clamp(0.0, 1.0));
    }

    pub fn adjust(&mut self, name: &str, delta: f32) {
        let value = self.level(name) + delta;
        self.set(name, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Every stored value lies in 0.0..=1.0
    pub fn is_bounded(&self) -> bool {
        self.0.values().all(|v| (0.0..=1.0).contains(v))
    }
}

/// Social role an agent plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Leader,
    Joker,
    Outcast,
    Sage,
    Follower,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Leader, Role::Joker, Role::Outcast, Role::Sage, Role::Follower];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Leader => "leader",
            Role::Joker => "joker",
            Role::Outcast => "outcast",
            Role::Sage => "sage",
            Role::Follower => "follower",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of an agent appended to its diary every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub age: u64,
    pub emotions: Emotions,
    pub memory_len: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

/// A member of the society
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: String,
    pub generation: u32,
    pub parent_id: Option<String>,
    /// Append-only
    pub memory: Vec<String>,
    pub skills: BTreeMap<String, f32>,
    pub emotions: Emotions,
    pub diary: Vec<DiaryEntry>,
    /// Shared with the culture store, in the order received
    pub artifacts: Vec<ArtifactHandle>,
    /// Rules this agent authored
    pub rules: Vec<String>,
    pub role: Option<Role>,
    pub goal: Option<String>,
    pub mode: Option<AgentMode>,
    pub alive: bool,
    pub age: u64,
}

impl Agent {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            generation: 0,
            parent_id: None,
            memory: Vec::new(),
            skills: BTreeMap::new(),
            emotions: Emotions::default(),
            diary: Vec::new(),
            artifacts: Vec::new(),
            rules: Vec::new(),
            role: None,
            goal: None,
            mode: None,
            alive: true,
            age: 0,
        }
    }

    /// Create a child of `parent` carrying the tail of its memory and artifacts
    pub fn inherit(
        id: impl Into<String>,
        parent: &Agent,
        memories: usize,
        artifacts: usize,
    ) -> Self {
        let mut child = Agent::new(id);
        child.generation = parent.generation + 1;
        child.parent_id = Some(parent.id.clone());
        child.memory = tail(&parent.memory, memories).to_vec();
        child.artifacts = tail(&parent.artifacts, artifacts).to_vec();
        child
    }

    /// Take in a message and, optionally, an artifact that came with it
    pub fn perceive(&mut self, message: impl Into<String>, artifact: Option<ArtifactHandle>) {
        self.memory.push(message.into());
        if let Some(artifact) = artifact {
            self.artifacts.push(artifact);
        }
    }

    pub fn joy(&self) -> f32 {
        self.emotions.level(JOY)
    }

    pub fn sadness(&self) -> f32 {
        self.emotions.level(SADNESS)
    }

    /// Mark the agent not alive if sadness exceeds the threshold.
    /// Returns whether the agent is still alive.
    pub fn evaluate_viability(&mut self, removal_sadness: f32) -> bool {
        if self.alive && self.sadness() > removal_sadness {
            self.alive = false;
        }
        self.alive
    }

    pub fn record_diary(&mut self) {
        self.diary.push(DiaryEntry {
            age: self.age,
            emotions: self.emotions.clone(),
            memory_len: self.memory.len(),
            goal: self.goal.clone(),
        });
    }

    pub fn carries(&self, content: &str) -> bool {
        self.artifacts.iter().any(|a| a.content == content)
    }

    pub fn latest_artifact(&self) -> Option<ArtifactHandle> {
        self.artifacts.last().map(Arc::clone)
    }
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}
