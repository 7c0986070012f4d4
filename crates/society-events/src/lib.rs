//! Shared snapshot, event, and control types for the society simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Anything that crosses the boundary of the simulation (snapshots served to
//! observers, the event stream, control requests) is defined here.

pub mod control;
pub mod event;
pub mod snapshot;

pub use control::{ControlRequest, ControlResponse, EmotionalEvent, DEFAULT_IMPORTANCE};
pub use event::{generate_event_id, EventKind, SocietyEvent};
pub use snapshot::{
    generate_snapshot_id, ArtifactSnapshot, EnvironmentSnapshot, HistoryEntry, WorldSnapshot,
};
