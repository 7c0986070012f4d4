//! Control Surface
//!
//! [`SocietyController`] answers [`ControlRequest`]s against a world. Every
//! failure comes back as a structured error response; the world is left
//! steppable no matter what a request contains. Events the world records
//! while answering are drained after every request and forwarded to the
//! controller's event logger, if it has one.

pub mod emotion;
pub mod files;

pub use emotion::{resolve_importance, EmotionLedger, EmotionalMemory};
pub use files::{apply_interventions, scan_interventions, INTERVENTIONS_DIR, REJECTED_DIR};

use std::path::{Path, PathBuf};
use tracing::warn;

use society_events::{ControlRequest, ControlResponse, EmotionalEvent, WorldSnapshot};

use crate::components::artifact::ArtifactDraft;
use crate::error::{Result, SocietyError};
use crate::events::EventLogger;
use crate::output::save::{read_document, write_document, DEFAULT_SAVE_FILE};
use crate::world::World;

pub struct SocietyController {
    world: World,
    emotional_memory: Box<dyn EmotionalMemory>,
    save_path: PathBuf,
    event_logger: Option<EventLogger>,
}

impl SocietyController {
    /// Controller with an in-memory emotion ledger and the default save file
    pub fn new(world: World) -> Self {
        Self {
            world,
            emotional_memory: Box::new(EmotionLedger::new()),
            save_path: PathBuf::from(DEFAULT_SAVE_FILE),
            event_logger: None,
        }
    }

    pub fn with_emotional_memory(mut self, memory: Box<dyn EmotionalMemory>) -> Self {
        self.emotional_memory = memory;
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = path.into();
        self
    }

    /// Write every event the world records to `logger`
    pub fn with_event_logger(mut self, logger: EventLogger) -> Self {
        self.event_logger = Some(logger);
        self
    }

    /// Parse and answer a JSON request
    pub fn handle_json(&mut self, json: &str) -> ControlResponse {
        match serde_json::from_str::<ControlRequest>(json) {
            Ok(request) => self.handle(request),
            Err(e) => {
                warn!(error = %e, "malformed request");
                ControlResponse::error(format!("malformed request: {}", e))
            }
        }
    }

    pub fn handle(&mut self, request: ControlRequest) -> ControlResponse {
        let response = match self.dispatch(request) {
            Ok(response) => response,
            Err(e) => {
                let reason = e.to_string();
                warn!(%reason, "request rejected");
                ControlResponse::error(reason)
            }
        };
        self.forward_events();
        response
    }

    /// Advance the world one tick and forward what it recorded.
    pub fn step(&mut self) -> WorldSnapshot {
        self.world.step();
        self.forward_events();
        self.world.snapshot()
    }

    fn forward_events(&mut self) {
        let events = self.world.drain_events();
        if let Some(logger) = self.event_logger.as_mut() {
            if let Err(e) = logger.log_batch(&events) {
                warn!(error = %e, "failed to write events");
            }
        }
    }

    pub fn flush_events(&mut self) {
        if let Some(logger) = self.event_logger.as_mut() {
            if let Err(e) = logger.flush() {
                warn!(error = %e, "failed to flush event log");
            }
        }
    }

    /// Events forwarded to the logger so far
    pub fn event_count(&self) -> u64 {
        self.event_logger.as_ref().map_or(0, EventLogger::event_count)
    }

    fn dispatch(&mut self, request: ControlRequest) -> Result<ControlResponse> {
        match request {
            ControlRequest::Snapshot => Ok(ControlResponse::with_snapshot(self.world.snapshot())),
            ControlRequest::Step => Ok(ControlResponse::with_snapshot(self.step())),
            ControlRequest::InjectArtifact {
                content,
                author_id,
                tags,
            } => {
                let injection = self
                    .world
                    .inject_artifact(ArtifactDraft::new(content, author_id).with_tags(tags));
                Ok(match self.world.culture().get(injection.artifact.id) {
                    Some(artifact) => ControlResponse::with_artifact(artifact.to_snapshot()),
                    None => ControlResponse::ok(),
                })
            }
            ControlRequest::TriggerEmotion {
                agent_id,
                event,
                emotion,
                importance,
            } => {
                if self.world.agent(&agent_id).is_none() {
                    return Err(SocietyError::AgentNotFound(agent_id));
                }
                let event = EmotionalEvent {
                    event,
                    emotion,
                    importance: resolve_importance(importance),
                    tick: self.world.tick(),
                };
                self.emotional_memory.record(&agent_id, event);
                Ok(ControlResponse::ok())
            }
            ControlRequest::EvolveAgent { agent_id, mode } => {
                self.world.evolve_agent(&agent_id, &mode)?;
                Ok(ControlResponse::ok())
            }
            ControlRequest::Save { path } => {
                self.save(path.as_deref())?;
                Ok(ControlResponse::ok())
            }
            ControlRequest::Load { path } => {
                self.load(path.as_deref())?;
                Ok(ControlResponse::with_snapshot(self.world.snapshot()))
            }
        }
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = path.unwrap_or(self.save_path.as_path()).to_path_buf();
        write_document(&self.world.to_document(), &path)?;
        Ok(path)
    }

    pub fn load(&mut self, path: Option<&Path>) -> Result<()> {
        let path = path.unwrap_or(self.save_path.as_path());
        let document = read_document(path)?;
        self.world.load_document(document)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn emotional_memory(&self) -> &dyn EmotionalMemory {
        self.emotional_memory.as_ref()
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }
}
