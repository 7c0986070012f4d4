//! Save Documents
//!
//! The complete, restorable state of a world: population, culture,
//! environment, relationships, and the counters that keep ids unique.
//! Snapshots are for observers; save documents are for resuming.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use society_events::{ArtifactSnapshot, EnvironmentSnapshot};

use crate::behaviors::AgentMode;
use crate::components::agent::{Agent, DiaryEntry, Emotions, Role};
use crate::components::artifact::{Artifact, ArtifactHandle, ArtifactId, ArtifactIdentity};
use crate::components::social::RelationshipGraph;
use crate::error::{Result, SocietyError};

/// Current save format
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Default save file name
pub const DEFAULT_SAVE_FILE: &str = "society_save.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDocument {
    pub version: u32,
    pub run_id: Uuid,
    pub seed: u64,
    pub tick: u64,
    pub generation: u32,
    pub next_agent_index: u64,
    pub next_artifact_id: u64,
    #[serde(default)]
    pub rules: Vec<String>,
    pub environment: EnvironmentSnapshot,
    #[serde(default)]
    pub culture: Vec<ArtifactSnapshot>,
    #[serde(default)]
    pub agents: Vec<AgentRecord>,
    #[serde(default)]
    pub relationships: RelationshipGraph,
}

/// One agent as persisted. Carried artifacts are stored by full identity
/// since the culture store may already have forgotten them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: String,
    pub generation: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub memory: Vec<String>,
    #[serde(default)]
    pub skills: BTreeMap<String, f32>,
    #[serde(default)]
    pub emotions: Emotions,
    #[serde(default)]
    pub diary: Vec<DiaryEntry>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactIdentity>,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AgentMode>,
    pub age: u64,
}

impl AgentRecord {
    pub fn from_agent(agent: &Agent) -> Self {
        Self {
            id: agent.id.clone(),
            generation: agent.generation,
            parent_id: agent.parent_id.clone(),
            memory: agent.memory.clone(),
            skills: agent.skills.clone(),
            emotions: agent.emotions.clone(),
            diary: agent.diary.clone(),
            artifacts: agent.artifacts.iter().map(|a| a.as_ref().clone()).collect(),
            rules: agent.rules.clone(),
            role: agent.role,
            goal: agent.goal.clone(),
            mode: agent.mode,
            age: agent.age,
        }
    }
}

/// Validated pieces of a document, ready to swap into a world
#[derive(Debug)]
pub struct RestoredState {
    pub artifacts: Vec<Artifact>,
    pub agents: Vec<Agent>,
}

impl SaveDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SocietyError::MalformedState(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the document and rebuild culture and population from it.
    /// Carried artifacts that are still in the culture share its identity.
    pub fn rebuild(&self) -> Result<RestoredState> {
        if self.version != SAVE_FORMAT_VERSION {
            return Err(SocietyError::UnsupportedVersion(self.version));
        }

        let mut handles: HashMap<ArtifactId, ArtifactHandle> = HashMap::new();
        let mut artifacts = Vec::with_capacity(self.culture.len());
        for snapshot in &self.culture {
            if !snapshot.popularity.is_finite() || snapshot.popularity < 0.0 {
                return Err(malformed(format!(
                    "artifact {} has popularity {}",
                    snapshot.artifact_id, snapshot.popularity
                )));
            }
            if snapshot.artifact_id >= self.next_artifact_id {
                return Err(malformed(format!(
                    "artifact {} is not below the next artifact id {}",
                    snapshot.artifact_id, self.next_artifact_id
                )));
            }
            let artifact = Artifact::from_snapshot(snapshot);
            if handles
                .insert(artifact.id(), Arc::clone(artifact.identity()))
                .is_some()
            {
                return Err(malformed(format!("duplicate artifact {}", snapshot.artifact_id)));
            }
            artifacts.push(artifact);
        }

        let mut seen = HashSet::new();
        let mut agents = Vec::with_capacity(self.agents.len());
        for record in &self.agents {
            if !seen.insert(record.id.as_str()) {
                return Err(malformed(format!("duplicate agent id '{}'", record.id)));
            }
            if !record.emotions.is_bounded() {
                return Err(malformed(format!("agent '{}' has emotions outside [0, 1]", record.id)));
            }
            agents.push(restore_agent(record, &mut handles)?);
        }

        if !self.relationships.is_symmetric() {
            return Err(malformed("relationships are not symmetric"));
        }

        Ok(RestoredState { artifacts, agents })
    }
}

fn restore_agent(record: &AgentRecord, handles: &mut HashMap<ArtifactId, ArtifactHandle>) -> Result<Agent> {
    let mut agent = Agent::new(record.id.clone());
    agent.generation = record.generation;
    agent.parent_id = record.parent_id.clone();
    agent.memory = record.memory.clone();
    agent.skills = record.skills.clone();
    agent.emotions = record.emotions.clone();
    agent.diary = record.diary.clone();
    agent.rules = record.rules.clone();
    agent.role = record.role;
    agent.goal = record.goal.clone();
    agent.mode = record.mode;
    agent.age = record.age;

    for identity in &record.artifacts {
        let handle = match handles.get(&identity.id) {
            Some(known) if known.as_ref() == identity => Arc::clone(known),
            Some(_) => {
                return Err(malformed(format!(
                    "agent '{}' carries a conflicting copy of artifact {}",
                    record.id, identity.id.0
                )))
            }
            None => {
                let handle = Arc::new(identity.clone());
                handles.insert(identity.id, Arc::clone(&handle));
                handle
            }
        };
        agent.artifacts.push(handle);
    }
    Ok(agent)
}

fn malformed(reason: impl Into<String>) -> SocietyError {
    SocietyError::MalformedState(reason.into())
}

pub fn write_document(document: &SaveDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, document.to_json()?)?;
    Ok(())
}

pub fn read_document(path: impl AsRef<Path>) -> Result<SaveDocument> {
    let json = fs::read_to_string(path)?;
    SaveDocument::from_json(&json)
}
