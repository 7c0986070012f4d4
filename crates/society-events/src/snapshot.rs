//! Snapshot Types
//!
//! Serialization structs for the observable state of a society at a tick.

use serde::{Deserialize, Serialize};

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// One provenance record: which agent received an artifact, and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub agent_id: String,
    pub tick: u64,
}

/// Serialized artifact as exposed by the culture store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSnapshot {
    pub artifact_id: u64,
    pub content: String,
    pub author_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub popularity: f32,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl ArtifactSnapshot {
    /// Trending means popularity strictly above the store's threshold.
    pub fn is_trending(&self, threshold: f32) -> bool {
        self.popularity > threshold
    }
}

/// Global environment scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    pub resources: u32,
    pub stress_level: f32,
    #[serde(default)]
    pub recent_events: Vec<String>,
}

/// Observable state of the whole society
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub num_agents: usize,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub culture: Vec<ArtifactSnapshot>,
    #[serde(default)]
    pub agents: Vec<String>,
    #[serde(default)]
    pub generation: u32,
    pub environment: EnvironmentSnapshot,
}

impl WorldSnapshot {
    /// Content of every artifact trending at `threshold`, in store order.
    pub fn trending(&self, threshold: f32) -> Vec<&str> {
        self.culture
            .iter()
            .filter(|a| a.is_trending(threshold))
            .map(|a| a.content.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(content: &str, popularity: f32) -> ArtifactSnapshot {
        ArtifactSnapshot {
            artifact_id: 1,
            content: content.to_string(),
            author_id: "agent_0".to_string(),
            tags: Vec::new(),
            popularity,
            history: Vec::new(),
        }
    }

    #[test]
    fn test_snapshot_id_format() {
        assert_eq!(generate_snapshot_id(1), "snap_000001");
        assert_eq!(generate_snapshot_id(42), "snap_000042");
    }

    #[test]
    fn test_trending_filter() {
        let snapshot = WorldSnapshot {
            tick: 3,
            num_agents: 2,
            rules: Vec::new(),
            culture: vec![
                artifact("quiet", 1.0),
                artifact("loud", 1.6),
                artifact("roar", 2.4),
            ],
            agents: vec!["agent_0".to_string(), "agent_1".to_string()],
            generation: 0,
            environment: EnvironmentSnapshot {
                resources: 1000,
                stress_level: 0.2,
                recent_events: Vec::new(),
            },
        };

        assert_eq!(snapshot.trending(1.5), vec!["loud", "roar"]);
        assert_eq!(snapshot.trending(2.0), vec!["roar"]);
        assert!(snapshot.trending(2.4).is_empty());
    }

    #[test]
    fn test_snapshot_parses_with_missing_optional_fields() {
        let json = r#"{
            "tick": 0,
            "num_agents": 0,
            "environment": { "resources": 10, "stress_level": 0.5 }
        }"#;

        let parsed: WorldSnapshot = serde_json::from_str(json).unwrap();
        assert!(parsed.rules.is_empty());
        assert!(parsed.environment.recent_events.is_empty());
    }
}
