//! Social Components
//!
//! Pairwise relationship strength between agents. Every update writes both
//! directions, so `strength(a, b) == strength(b, a)` always holds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Symmetric relationship strengths keyed by agent id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipGraph {
    bonds: BTreeMap<String, BTreeMap<String, f32>>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the bond between `a` and `b`.
    pub fn strengthen(&mut self, a: &str, b: &str, amount: f32) {
        if a == b {
            return;
        }
        let next = (self.strength(a, b) + amount).max(0.0);
        self.set(a, b, next);
    }

    fn set(&mut self, a: &str, b: &str, value: f32) {
        self.bonds
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), value);
        self.bonds
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string(), value);
    }

    /// Fade every bond by `factor`.
    pub fn decay(&mut self, factor: f32) {
        let factor = factor.max(0.0);
        for row in self.bonds.values_mut() {
            for strength in row.values_mut() {
                *strength *= factor;
            }
        }
    }

    pub fn strength(&self, a: &str, b: &str) -> f32 {
        self.bonds
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or(0.0)
    }

    /// Bonds of one agent, strongest first
    pub fn bonds_of(&self, agent_id: &str) -> Vec<(&str, f32)> {
        let mut bonds: Vec<(&str, f32)> = self
            .bonds
            .get(agent_id)
            .map(|row| row.iter().map(|(k, v)| (k.as_str(), *v)).collect())
            .unwrap_or_default();
        bonds.sort_by(|x, y| y.1.partial_cmp(&x.1).unwrap_or(std::cmp::Ordering::Equal));
        bonds
    }

    /// Drop an agent's row and every column that points at it
    pub fn remove_agent(&mut self, agent_id: &str) {
        self.bonds.remove(agent_id);
        for row in self.bonds.values_mut() {
            row.remove(agent_id);
        }
        self.bonds.retain(|_, row| !row.is_empty());
    }

    pub fn is_symmetric(&self) -> bool {
        self.bonds.iter().all(|(a, row)| {
            row.iter()
                .all(|(b, v)| self.bonds.get(b).and_then(|r| r.get(a)) == Some(v))
        })
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = &str> {
        self.bonds.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
}
