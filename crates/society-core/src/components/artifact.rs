//! Artifact Components
//!
//! An artifact (meme) has an immutable identity, shared by every agent that
//! carries it, and mutable popularity and provenance owned by the culture store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use society_events::{ArtifactSnapshot, HistoryEntry};

/// Unique identifier for an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(pub u64);

/// The part of an artifact that never changes once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactIdentity {
    pub id: ArtifactId,
    pub content: String,
    pub author_id: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// Shared handle to an artifact identity. Agents hold these; they do not own
/// the artifact and keep the handle after the store forgets it.
pub type ArtifactHandle = Arc<ArtifactIdentity>;

/// An artifact that has been described but not yet added to a culture store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDraft {
    pub content: String,
    pub author_id: String,
    pub tags: BTreeSet<String>,
}

impl ArtifactDraft {
    pub fn new(content: impl Into<String>, author_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author_id: author_id.into(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

/// A live artifact in the culture store
#[derive(Debug, Clone)]
pub struct Artifact {
    identity: ArtifactHandle,
    popularity: f32,
    history: Vec<HistoryEntry>,
}

impl Artifact {
    pub fn new(identity: ArtifactHandle, popularity: f32) -> Self {
        Self {
            identity,
            popularity: popularity.max(0.0),
            history: Vec::new(),
        }
    }

    /// Rebuild a stored artifact from its serialized form
    pub fn from_snapshot(snapshot: &ArtifactSnapshot) -> Self {
        let identity = ArtifactIdentity {
            id: ArtifactId(snapshot.artifact_id),
            content: snapshot.content.clone(),
            author_id: snapshot.author_id.clone(),
            tags: snapshot.tags.iter().cloned().collect(),
        };
        Self {
            identity: Arc::new(identity),
            popularity: snapshot.popularity.max(0.0),
            history: snapshot.history.clone(),
        }
    }

    pub fn identity(&self) -> &ArtifactHandle {
        &self.identity
    }

    pub fn id(&self) -> ArtifactId {
        self.identity.id
    }

    pub fn content(&self) -> &str {
        &self.identity.content
    }

    pub fn popularity(&self) -> f32 {
        self.popularity
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Multiply popularity by `multiplier` and record who spread it.
    pub fn spread(&mut self, agent_id: impl Into<String>, tick: u64, multiplier: f32) {
        self.popularity = (self.popularity * multiplier).max(0.0);
        self.history.push(HistoryEntry {
            agent_id: agent_id.into(),
            tick,
        });
    }

    pub fn decay(&mut self, factor: f32) {
        self.popularity = (self.popularity * factor).max(0.0);
    }

    pub fn is_trending(&self, threshold: f32) -> bool {
        self.popularity > threshold
    }

    pub fn to_snapshot(&self) -> ArtifactSnapshot {
        ArtifactSnapshot {
            artifact_id: self.identity.id.0,
            content: self.identity.content.clone(),
            author_id: self.identity.author_id.clone(),
            tags: self.identity.tags.iter().cloned().collect(),
            popularity: self.popularity,
            history: self.history.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> Artifact {
        let identity = ArtifactIdentity {
            id: ArtifactId(3),
            content: "river song".to_string(),
            author_id: "agent_1".to_string(),
            tags: ["music".to_string()].into_iter().collect(),
        };
        Artifact::new(Arc::new(identity), 1.0)
    }

    #[test]
    fn test_spread_appends_history_in_order() {
        let mut a = artifact();
        a.spread("agent_2", 4, 1.05);
        a.spread("agent_5", 9, 1.05);

        assert!(a.popularity() > 1.1);
        let who: Vec<_> = a.history().iter().map(|h| h.agent_id.as_str()).collect();
        assert_eq!(who, vec!["agent_2", "agent_5"]);
        assert_eq!(a.history()[1].tick, 9);
    }

    #[test]
    fn test_decay_never_goes_negative() {
        let mut a = artifact();
        a.decay(-3.0);
        assert_eq!(a.popularity(), 0.0);
    }

    #[test]
    fn test_snapshot_carries_identity() {
        let mut a = artifact();
        a.spread("agent_2", 1, 1.0);
        let snap = a.to_snapshot();
        let rebuilt = Artifact::from_snapshot(&snap);

        assert_eq!(rebuilt.identity().as_ref(), a.identity().as_ref());
        assert_eq!(rebuilt.history(), a.history());
        assert_eq!(snap.tags, vec!["music".to_string()]);
    }

    #[test]
    fn test_draft_tags_are_a_set() {
        let draft = ArtifactDraft::new("x", "agent_0").with_tags(["a", "b", "a"]);
        assert_eq!(draft.tags.len(), 2);
    }
}
