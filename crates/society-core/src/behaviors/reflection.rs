//! Reflection and goal setting.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::agent::{Agent, SADNESS};

/// Goal chosen when the diary holds painful entries
pub const AVOID_MISTAKES: &str = "avoid past mistakes";

/// Goals chosen otherwise, uniformly
pub const GOALS: [&str; 3] = ["become a leader", "create an artifact", "help a friend"];

#[derive(Debug, Clone, Copy)]
pub struct Reflection {
    /// Diary entries sadder than this count as mistakes
    mistake_sadness: f32,
}

impl Default for Reflection {
    fn default() -> Self {
        Self {
            mistake_sadness: 0.7,
        }
    }
}

impl Reflection {
    /// Look back through the diary and set a new goal
    pub fn reflect<R: Rng + ?Sized>(&self, agent: &mut Agent, rng: &mut R) -> String {
        let regretful = agent
            .diary
            .iter()
            .any(|entry| entry.emotions.get(SADNESS).unwrap_or(0.0) > self.mistake_sadness);

        let goal = if regretful {
            AVOID_MISTAKES
        } else {
            GOALS.choose(rng).copied().unwrap_or(GOALS[0])
        };

        agent.goal = Some(goal.to_string());
        agent.memory.push(format!("reflection: {}", goal));
        goal.to_string()
    }
}
