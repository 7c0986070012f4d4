//! Control Surface Types
//!
//! Requests an external layer (HTTP handler, intervention file, test) can
//! send to a running society, and the structured responses it gets back.
//! Unknown request shapes fail to parse rather than being half-applied.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::snapshot::{ArtifactSnapshot, WorldSnapshot};

/// Importance assigned to an emotional event when the caller gives none
pub const DEFAULT_IMPORTANCE: f32 = 0.5;

/// A request against the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ControlRequest {
    /// Read the current snapshot
    Snapshot,
    /// Advance one tick and return the resulting snapshot
    Step,
    /// Add an artifact to the culture and hand it to one living agent
    InjectArtifact {
        content: String,
        author_id: String,
        #[serde(default)]
        tags: Vec<String>,
    },
    /// Record an emotional event for an agent
    TriggerEmotion {
        agent_id: String,
        event: String,
        emotion: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        importance: Option<f32>,
    },
    /// Apply a named parenting mode to an agent
    EvolveAgent { agent_id: String, mode: String },
    /// Persist the full world state
    Save {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    /// Restore the full world state
    Load {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
}

/// Structured result of a [`ControlRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ControlResponse {
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        snapshot: Option<WorldSnapshot>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        artifact: Option<ArtifactSnapshot>,
    },
    Error { reason: String },
}

impl ControlResponse {
    pub fn ok() -> Self {
        ControlResponse::Ok {
            snapshot: None,
            artifact: None,
        }
    }

    pub fn with_snapshot(snapshot: WorldSnapshot) -> Self {
        ControlResponse::Ok {
            snapshot: Some(snapshot),
            artifact: None,
        }
    }

    pub fn with_artifact(artifact: ArtifactSnapshot) -> Self {
        ControlResponse::Ok {
            snapshot: None,
            artifact: Some(artifact),
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        ControlResponse::Error {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ControlResponse::Ok { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ControlResponse::Error { reason } => Some(reason),
            ControlResponse::Ok { .. } => None,
        }
    }
}

/// An emotional event handed to an agent's emotional memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalEvent {
    pub event: String,
    pub emotion: String,
    /// 0.0 to 1.0
    pub importance: f32,
    pub tick: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_request_parsing() {
        let json = r#"{
            "type": "inject_artifact",
            "content": "sunrise song",
            "author_id": "observer"
        }"#;

        let request: ControlRequest = serde_json::from_str(json).unwrap();
        match request {
            ControlRequest::InjectArtifact {
                content,
                author_id,
                tags,
            } => {
                assert_eq!(content, "sunrise song");
                assert_eq!(author_id, "observer");
                assert!(tags.is_empty());
            }
            _ => panic!("Wrong request type"),
        }
    }

    #[test]
    fn test_unknown_request_rejected() {
        let json = r#"{ "type": "summon_dragon", "agent_id": "agent_0" }"#;
        assert!(serde_json::from_str::<ControlRequest>(json).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{ "type": "evolve_agent", "agent_id": "agent_0", "mode": "strict", "force": true }"#;
        assert!(serde_json::from_str::<ControlRequest>(json).is_err());
    }

    #[test]
    fn test_error_response_shape() {
        let response = ControlResponse::error("agent not found");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["reason"], "agent not found");
        assert_eq!(response.reason(), Some("agent not found"));
    }

    #[test]
    fn test_ok_response_omits_empty_payload() {
        let json = serde_json::to_value(ControlResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }
}
