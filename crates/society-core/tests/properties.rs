//! Behavioral properties of the society that must hold for any seed.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;

use society_core::components::{
    ArtifactHandle, ArtifactId, ArtifactIdentity, CultureStore, SADNESS,
};
use society_core::config::CultureConfig;
use society_core::{SocietyConfig, World};

fn handle(id: u64, content: &str) -> ArtifactHandle {
    Arc::new(ArtifactIdentity {
        id: ArtifactId(id),
        content: content.to_string(),
        author_id: "outsider".to_string(),
        tags: Default::default(),
    })
}

#[test]
fn test_spread_always_raises_popularity() {
    let mut store = CultureStore::new(CultureConfig::default());
    let artifact = store.add("lullaby", "agent_0", Vec::<String>::new());
    let mut rng = SmallRng::seed_from_u64(1);

    for tick in 0..200 {
        let before = store.get(artifact.id).unwrap().popularity();
        assert!(store.spread(artifact.id, "agent_1", tick, &mut rng));
        let after = store.get(artifact.id).unwrap().popularity();
        assert!(after > before, "tick {}: {} -> {}", tick, before, after);
    }
}

#[test]
fn test_decay_eventually_forgets() {
    let mut store = CultureStore::new(CultureConfig::default());
    let artifact = store.add("fad", "agent_0", Vec::<String>::new());

    let mut rounds = 0;
    while store.get(artifact.id).is_some() {
        store.decay();
        rounds += 1;
        assert!(rounds < 1000, "artifact never forgotten");
    }
    assert!(store.snapshot().iter().all(|a| a.content != "fad"));
}

#[test]
fn test_relationships_stay_symmetric() {
    let mut world = World::with_seed(5, 12);
    for _ in 0..30 {
        world.step();
        assert!(world.relationships().is_symmetric());
    }
    let ids: Vec<String> = world.agents().iter().map(|a| a.id.clone()).collect();
    for a in &ids {
        for b in &ids {
            assert_eq!(
                world.relationships().strength(a, b),
                world.relationships().strength(b, a)
            );
        }
    }
}

#[test]
fn test_heartbroken_agent_gone_after_one_step() {
    for seed in 0..20 {
        let mut world = World::with_seed(seed, 6);
        world.agent_mut("agent_3").unwrap().emotions.set(SADNESS, 0.96);
        world.step();
        assert!(
            !world.snapshot().agents.contains(&"agent_3".to_string()),
            "seed {}",
            seed
        );
    }
}

#[test]
fn test_revolution_when_most_carry_an_artifact() {
    let mut world = World::with_seed(11, 10);
    let anthem = handle(500, "anthem");
    for i in 0..7 {
        world
            .agent_mut(&format!("agent_{}", i))
            .unwrap()
            .perceive("heard the anthem", Some(Arc::clone(&anthem)));
    }

    let uprising = world.check_revolution().unwrap();
    assert_eq!(uprising.content, "anthem");
    assert!(world.snapshot().rules.contains(&"Revolution: anthem".to_string()));
}

#[test]
fn test_no_revolution_at_sixty_percent() {
    let mut world = World::with_seed(11, 10);
    let anthem = handle(500, "anthem");
    for i in 0..6 {
        world
            .agent_mut(&format!("agent_{}", i))
            .unwrap()
            .perceive("heard the anthem", Some(Arc::clone(&anthem)));
    }

    assert!(world.check_revolution().is_none());
    assert!(world.snapshot().rules.is_empty());
}

#[test]
fn test_revolution_at_the_next_check_opportunity() {
    let mut config = SocietyConfig::default();
    config.simulation.initial_agents = 10;
    config.behavior.revolution_check = 1.0;
    let mut world = World::new(config);
    let anthem = handle(500, "anthem");
    for i in 0..7 {
        world
            .agent_mut(&format!("agent_{}", i))
            .unwrap()
            .perceive("heard the anthem", Some(Arc::clone(&anthem)));
    }

    world.step();
    assert!(world.snapshot().rules.contains(&"Revolution: anthem".to_string()));
}

#[test]
fn test_inheritance_takes_tails() {
    let mut world = World::with_seed(2, 1);
    {
        let parent = world.agent_mut("agent_0").unwrap();
        parent.memory = (1..=10).map(|i| format!("m{}", i)).collect();
        parent.artifacts = (1..=3).map(|i| handle(i, &format!("c{}", i))).collect();
    }

    let child_id = world.inherit_experience("agent_0").unwrap();
    let child = world.agent(&child_id).unwrap();

    assert_eq!(child.memory, vec!["m6", "m7", "m8", "m9", "m10"]);
    let carried: Vec<&str> = child.artifacts.iter().map(|a| a.content.as_str()).collect();
    assert_eq!(carried, vec!["c2", "c3"]);
    assert_eq!(child.generation, 1);
    assert_eq!(child.parent_id.as_deref(), Some("agent_0"));
    assert_eq!(world.generation(), 1);
}

#[test]
fn test_population_never_grows_without_inheritance() {
    let mut world = World::with_seed(21, 15);
    let mut previous = world.snapshot().num_agents;
    for _ in 0..200 {
        world.step();
        let now = world.snapshot().num_agents;
        assert!(now <= previous);
        previous = now;
    }
}

#[test]
fn test_invariants_hold_over_a_long_run() {
    let mut world = World::with_seed(3, 10);
    for _ in 0..150 {
        world.step();
        let snapshot = world.snapshot();
        assert!((0.0..=1.0).contains(&snapshot.environment.stress_level));
        assert!(snapshot.environment.recent_events.len() <= 5);
        assert!(snapshot.culture.iter().all(|a| a.popularity > 0.1));
        assert!(world.agents().iter().all(|a| a.alive && a.emotions.is_bounded()));
    }
}
