//! Dream replay: an agent revisits a random memory and grows more empathetic.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::agent::{Agent, EMPATHY};

#[derive(Debug, Clone, Copy)]
pub struct DreamEngine {
    empathy_gain: f32,
}

impl Default for DreamEngine {
    fn default() -> Self {
        Self::new(0.2)
    }
}

impl DreamEngine {
    pub fn new(empathy_gain: f32) -> Self {
        Self {
            empathy_gain: empathy_gain.max(0.0),
        }
    }

    /// Replay one memory. Returns the replayed entry, or `None` when the
    /// agent has nothing to dream about.
    pub fn dream<R: Rng + ?Sized>(&self, agent: &mut Agent, rng: &mut R) -> Option<String> {
        let replayed = agent.memory.choose(rng)?.clone();
        let gain = rng.gen_range(0.0..=self.empathy_gain);
        agent.emotions.adjust(EMPATHY, gain);
        agent.memory.push(format!("dream of: {}", replayed));
        Some(replayed)
    }
}
