//! Pairwise interaction between agents.

use rand::seq::index;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::agent::{Agent, JOY};
use crate::components::artifact::ArtifactHandle;
use crate::components::culture::CultureStore;

/// Borrow two distinct agents mutably. `None` when the indices are equal or
/// out of range.
pub fn pair_mut(agents: &mut [Agent], a: usize, b: usize) -> Option<(&mut Agent, &mut Agent)> {
    if a == b || a >= agents.len() || b >= agents.len() {
        return None;
    }
    if a < b {
        let (left, right) = agents.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = agents.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

/// Indices of every living agent other than `idx`, in population order
pub fn living_others(agents: &[Agent], idx: usize) -> Vec<usize> {
    agents
        .iter()
        .enumerate()
        .filter(|(j, a)| *j != idx && a.alive)
        .map(|(j, _)| j)
        .collect()
}

/// Pick a random living agent other than `idx`
pub(crate) fn choose_other<R: Rng + ?Sized>(agents: &[Agent], idx: usize, rng: &mut R) -> Option<usize> {
    living_others(agents, idx).choose(rng).copied()
}

/// Two distinct living agents chosen uniformly, or `None` when fewer than two live.
pub fn sample_living_pair<R: Rng + ?Sized>(agents: &[Agent], rng: &mut R) -> Option<(usize, usize)> {
    let living: Vec<usize> = agents
        .iter()
        .enumerate()
        .filter(|(_, a)| a.alive)
        .map(|(i, _)| i)
        .collect();
    if living.len() < 2 {
        return None;
    }
    let picked = index::sample(rng, living.len(), 2);
    Some((living[picked.index(0)], living[picked.index(1)]))
}

/// `giver` hands `receiver` a random artifact from the culture store, then the
/// two settle on their average joy. Returns the delivered artifact, if any.
pub fn interact<R: Rng + ?Sized>(
    giver: usize,
    receiver: usize,
    agents: &mut [Agent],
    culture: &mut CultureStore,
    rng: &mut R,
    tick: u64,
) -> Option<ArtifactHandle> {
    let (giver, receiver) = pair_mut(agents, giver, receiver)?;

    let delivered = culture.choose(rng);
    if let Some(handle) = &delivered {
        receiver.perceive(
            format!("{} shared an artifact", giver.id),
            Some(ArtifactHandle::clone(handle)),
        );
        culture.spread(handle.id, &receiver.id, tick, rng);
    }

    let joy = (giver.joy() + receiver.joy()) / 2.0;
    giver.emotions.set(JOY, joy);
    receiver.emotions.set(JOY, joy);

    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CultureConfig;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn agents(n: usize) -> Vec<Agent> {
        (0..n).map(|i| Agent::new(format!("agent_{}", i))).collect()
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut pop = agents(4);
        let (a, b) = pair_mut(&mut pop, 3, 1).unwrap();
        assert_eq!(a.id, "agent_3");
        assert_eq!(b.id, "agent_1");
        assert!(pair_mut(&mut pop, 2, 2).is_none());
        assert!(pair_mut(&mut pop, 0, 9).is_none());
    }

    #[test]
    fn test_sample_skips_the_dead() {
        let mut pop = agents(3);
        pop[1].alive = false;
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..20 {
            let (a, b) = sample_living_pair(&pop, &mut rng).unwrap();
            assert_ne!(a, b);
            assert!(a != 1 && b != 1);
        }
        pop[2].alive = false;
        assert!(sample_living_pair(&pop, &mut rng).is_none());
    }

    #[test]
    fn test_interact_delivers_and_averages_joy() {
        let mut pop = agents(2);
        pop[0].emotions.set(JOY, 0.9);
        pop[1].emotions.set(JOY, 0.1);
        let mut culture = CultureStore::new(CultureConfig::default());
        let handle = culture.add("tune", "agent_0", Vec::<String>::new());
        let mut rng = SmallRng::seed_from_u64(5);

        let delivered = interact(0, 1, &mut pop, &mut culture, &mut rng, 7).unwrap();

        assert_eq!(delivered.id, handle.id);
        assert_eq!(pop[1].memory, vec!["agent_0 shared an artifact"]);
        assert!(pop[1].carries("tune"));
        assert!((pop[0].joy() - 0.5).abs() < 1e-6);
        assert!((pop[1].joy() - 0.5).abs() < 1e-6);
        let history = culture.get(handle.id).unwrap().history();
        assert_eq!(history[0].agent_id, "agent_1");
        assert_eq!(history[0].tick, 7);
    }

    #[test]
    fn test_interact_with_empty_culture_only_shares_joy() {
        let mut pop = agents(2);
        pop[0].emotions.set(JOY, 1.0);
        let mut culture = CultureStore::new(CultureConfig::default());
        let mut rng = SmallRng::seed_from_u64(5);

        assert!(interact(0, 1, &mut pop, &mut culture, &mut rng, 1).is_none());
        assert!(pop[1].memory.is_empty());
        assert!((pop[1].joy() - 0.75).abs() < 1e-6);
    }
}
