//! Multi-agent society simulation
//!
//! Agents age, feel, remember, and trade artifacts (memes) through a shared
//! culture store, under a fluctuating environment. A [`World`] advances the
//! whole society one tick at a time; a [`SocietyController`] exposes it to
//! external requests and a [`LiveDriver`] pushes fresh snapshots at a cadence.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub mod behaviors;
pub mod components;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod interventions;
pub mod output;
pub mod systems;
pub mod world;

pub use config::{ConfigError, SocietyConfig};
pub use driver::LiveDriver;
pub use error::{Result, SocietyError};
pub use interventions::{EmotionLedger, EmotionalMemory, SocietyController};
pub use world::World;

/// Seeded random number generator. Every draw a world makes comes from
/// exactly one of these.
#[derive(Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

/// Bernoulli draw that tolerates out-of-range probabilities. NaN never fires.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    if probability.is_nan() {
        return false;
    }
    rng.gen_bool(probability.clamp(0.0, 1.0))
}
