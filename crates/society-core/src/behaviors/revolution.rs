//! Revolution Detection
//!
//! A revolution happens when one artifact is carried by more than a set
//! share of the living population.

use crate::components::agent::Agent;

/// The artifact that tipped the population, and by how much
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uprising {
    pub content: String,
    pub carriers: usize,
    pub population: usize,
}

impl Uprising {
    pub fn rule(&self) -> String {
        format!("Revolution: {}", self.content)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RevolutionDetector {
    share: f32,
}

impl Default for RevolutionDetector {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl RevolutionDetector {
    pub fn new(share: f32) -> Self {
        Self { share }
    }

    /// Count distinct carriers of each artifact content among living agents.
    ///
    /// Contents are ranked by first encounter, walking agents in population
    /// order and each agent's artifacts in the order received; the first
    /// content whose carrier share strictly exceeds the threshold wins.
    pub fn check(&self, agents: &[Agent]) -> Option<Uprising> {
        let living: Vec<&Agent> = agents.iter().filter(|a| a.alive).collect();
        if living.is_empty() {
            return None;
        }

        let mut counts: Vec<(&str, usize)> = Vec::new();
        for agent in &living {
            let mut seen: Vec<&str> = Vec::new();
            for artifact in &agent.artifacts {
                let content = artifact.content.as_str();
                if seen.contains(&content) {
                    continue;
                }
                seen.push(content);
                match counts.iter_mut().find(|(c, _)| *c == content) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((content, 1)),
                }
            }
        }

        let population = living.len();
        counts
            .into_iter()
            .find(|(_, carriers)| *carriers as f32 / population as f32 > self.share)
            .map(|(content, carriers)| Uprising {
                content: content.to_string(),
                carriers,
                population,
            })
    }
}
