//! Emotional memory
//!
//! Agents' emotional events live outside the simulation core, behind the
//! [`EmotionalMemory`] trait. [`EmotionLedger`] is the in-process default.

use std::collections::HashMap;

use society_events::{EmotionalEvent, DEFAULT_IMPORTANCE};

/// Where triggered emotional events are kept
pub trait EmotionalMemory: Send {
    fn record(&mut self, agent_id: &str, event: EmotionalEvent);

    /// Events recorded for one agent, oldest first
    fn events_for(&self, agent_id: &str) -> &[EmotionalEvent];
}

#[derive(Debug, Default)]
pub struct EmotionLedger {
    events: HashMap<String, Vec<EmotionalEvent>>,
}

impl EmotionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }
}

impl EmotionalMemory for EmotionLedger {
    fn record(&mut self, agent_id: &str, event: EmotionalEvent) {
        self.events.entry(agent_id.to_string()).or_default().push(event);
    }

    fn events_for(&self, agent_id: &str) -> &[EmotionalEvent] {
        self.events.get(agent_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Caller-supplied importance, defaulted and clamped to 0..=1
pub fn resolve_importance(importance: Option<f32>) -> f32 {
    match importance {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => DEFAULT_IMPORTANCE,
    }
}
