//! Role play and imitation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::agent::{Agent, Role, NEUTRAL_EMOTION};

#[derive(Debug, Clone, Copy, Default)]
pub struct RolePlay;

impl RolePlay {
    /// Give the agent a role chosen uniformly at random
    pub fn assign_role<R: Rng + ?Sized>(&self, agent: &mut Agent, rng: &mut R) -> Role {
        let role = *Role::ALL.choose(rng).unwrap_or(&Role::Follower);
        agent.role = Some(role);
        role
    }

    /// Move each of the agent's emotions halfway towards `other`'s.
    /// Emotions the agent has never felt start from neutral.
    pub fn imitate(&self, agent: &mut Agent, other: &Agent) {
        for (name, theirs) in other.emotions.iter() {
            let mine = agent.emotions.get(name).unwrap_or(NEUTRAL_EMOTION);
            agent.emotions.set(name, (mine + theirs) / 2.0);
        }
        agent.memory.push(format!("imitated {}", other.id));
    }
}
