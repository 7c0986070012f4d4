//! Environment Components
//!
//! Global pressures on the society: a resource pool, a stress level, and a
//! short window of named events. Advanced once per tick before agents act.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use society_events::EnvironmentSnapshot;

use super::culture::symmetric;
use crate::chance;
use crate::config::EnvironmentConfig;
use crate::error::SocietyError;

/// Named events the environment can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentEvent {
    Drought,
    Feast,
    Conflict,
    Discovery,
    Epidemic,
}

impl EnvironmentEvent {
    pub const ALL: [EnvironmentEvent; 5] = [
        EnvironmentEvent::Drought,
        EnvironmentEvent::Feast,
        EnvironmentEvent::Conflict,
        EnvironmentEvent::Discovery,
        EnvironmentEvent::Epidemic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentEvent::Drought => "drought",
            EnvironmentEvent::Feast => "feast",
            EnvironmentEvent::Conflict => "conflict",
            EnvironmentEvent::Discovery => "discovery",
            EnvironmentEvent::Epidemic => "epidemic",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == name)
    }
}

impl fmt::Display for EnvironmentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of the environment handed to agents each tick
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentState {
    pub resources: u32,
    pub stress_level: f32,
    pub recent_events: Vec<EnvironmentEvent>,
}

/// The shared environment
#[derive(Debug, Clone)]
pub struct Environment {
    config: EnvironmentConfig,
    resources: u32,
    stress_level: f32,
    recent_events: VecDeque<EnvironmentEvent>,
}

impl Environment {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            resources: config.initial_resources,
            stress_level: config.initial_stress.clamp(0.0, 1.0),
            recent_events: VecDeque::with_capacity(config.max_recent_events),
            config,
        }
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// One random-walk step. Returns the event produced this tick, if any.
    pub fn fluctuate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<EnvironmentEvent> {
        let swing = self.config.resource_swing.max(0);
        let delta = rng.gen_range(-swing..=swing);
        self.resources = (i64::from(self.resources) + delta).clamp(0, i64::from(u32::MAX)) as u32;

        let stress = self.stress_level + symmetric(rng, self.config.stress_swing);
        self.stress_level = stress.clamp(0.0, 1.0);

        if !chance(rng, self.config.event_probability) {
            return None;
        }
        let event = *EnvironmentEvent::ALL.choose(rng)?;
        self.push_event(event);
        Some(event)
    }

    fn push_event(&mut self, event: EnvironmentEvent) {
        self.recent_events.push_back(event);
        while self.recent_events.len() > self.config.max_recent_events {
            self.recent_events.pop_front();
        }
    }

    pub fn state(&self) -> EnvironmentState {
        EnvironmentState {
            resources: self.resources,
            stress_level: self.stress_level,
            recent_events: self.recent_events.iter().copied().collect(),
        }
    }

    pub fn resources(&self) -> u32 {
        self.resources
    }

    pub fn stress_level(&self) -> f32 {
        self.stress_level
    }

    pub fn set_resources(&mut self, resources: u32) {
        self.resources = resources;
    }

    pub fn set_stress_level(&mut self, stress_level: f32) {
        self.stress_level = stress_level.clamp(0.0, 1.0);
    }

    pub fn snapshot(&self) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            resources: self.resources,
            stress_level: self.stress_level,
            recent_events: self
                .recent_events
                .iter()
                .map(|e| e.as_str().to_string())
                .collect(),
        }
    }

    /// Restore scalars and event window from a snapshot.
    pub fn restore(&mut self, snapshot: &EnvironmentSnapshot) -> Result<(), SocietyError> {
        if !(0.0..=1.0).contains(&snapshot.stress_level) {
            return Err(SocietyError::MalformedState(format!(
                "stress level {} outside [0, 1]",
                snapshot.stress_level
            )));
        }
        let events = snapshot
            .recent_events
            .iter()
            .map(|name| {
                EnvironmentEvent::parse(name).ok_or_else(|| {
                    SocietyError::MalformedState(format!("unknown environment event '{}'", name))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.resources = snapshot.resources;
        self.stress_level = snapshot.stress_level;
        self.recent_events.clear();
        for event in events {
            self.push_event(event);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_fluctuate_respects_bounds() {
        let mut env = Environment::new(EnvironmentConfig::default());
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..5000 {
            let before = env.resources();
            env.fluctuate(&mut rng);
            assert!(env.resources().abs_diff(before) <= 50);
            assert!((0.0..=1.0).contains(&env.stress_level()));
            assert!(env.state().recent_events.len() <= 5);
        }
    }

    #[test]
    fn test_resources_never_negative() {
        let mut env = Environment::new(EnvironmentConfig {
            initial_resources: 3,
            ..EnvironmentConfig::default()
        });
        let mut rng = SmallRng::seed_from_u64(2);

        for _ in 0..200 {
            env.fluctuate(&mut rng);
        }
        // u32 cannot go negative; the walk must have clamped rather than wrapped
        assert!(env.resources() < 1_000_000);
    }

    #[test]
    fn test_event_window_keeps_latest_five() {
        let mut env = Environment::new(EnvironmentConfig {
            event_probability: 1.0,
            ..EnvironmentConfig::default()
        });
        let mut rng = SmallRng::seed_from_u64(3);

        let mut produced = Vec::new();
        for _ in 0..12 {
            produced.push(env.fluctuate(&mut rng).unwrap());
        }

        assert_eq!(env.state().recent_events, produced[7..].to_vec());
    }

    #[test]
    fn test_nan_event_probability_never_fires() {
        let mut env = Environment::new(EnvironmentConfig {
            event_probability: f64::NAN,
            ..EnvironmentConfig::default()
        });
        let mut rng = SmallRng::seed_from_u64(5);

        for _ in 0..100 {
            assert_eq!(env.fluctuate(&mut rng), None);
        }
        assert!(env.state().recent_events.is_empty());
    }

    #[test]
    fn test_restore_rejects_bad_stress() {
        let mut env = Environment::new(EnvironmentConfig::default());
        let bad = EnvironmentSnapshot {
            resources: 5,
            stress_level: 1.5,
            recent_events: Vec::new(),
        };
        assert!(env.restore(&bad).is_err());
        assert_eq!(env.resources(), 1000);
    }

    #[test]
    fn test_restore_round_trip() {
        let mut env = Environment::new(EnvironmentConfig::default());
        let snap = EnvironmentSnapshot {
            resources: 120,
            stress_level: 0.8,
            recent_events: vec!["feast".to_string(), "drought".to_string()],
        };
        env.restore(&snap).unwrap();
        assert_eq!(env.snapshot(), snap);
    }
}
