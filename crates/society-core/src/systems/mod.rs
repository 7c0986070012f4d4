//! Per-tick systems
//!
//! Each function here runs one phase of a tick against explicitly borrowed
//! pieces of the world, in the order `World::step` calls them:
//! agent routines, interaction rounds, then pruning.

pub mod interaction;
pub mod lifecycle;
pub mod routine;

pub use interaction::{interact, living_others, pair_mut, sample_living_pair};
pub use lifecycle::{agent_id, prune};
pub use routine::{run_agent_routine, RoutineContext, RoutineOutcome};
