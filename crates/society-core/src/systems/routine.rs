//! The per-tick behavior routine each living agent runs.
//!
//! Draws happen in this order, every tick, for every agent:
//! role roll (+role), imitation roll (+partner), artifact roll (+number),
//! rule roll, synthesis roll (+partner, +one artifact from each), revolution
//! roll, joy drift, sadness drift, dream (+memory, +gain), reflection roll
//! (+goal), inheritance roll.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use society_events::EventKind;

use super::interaction::{choose_other, pair_mut};
use crate::behaviors::Behaviors;
use crate::chance;
use crate::components::agent::{Agent, JOY, SADNESS};
use crate::components::artifact::ArtifactHandle;
use crate::components::culture::{symmetric, CultureStore};
use crate::components::environment::EnvironmentState;
use crate::config::SocietyConfig;
use crate::events::EventBuffer;

/// Everything outside the population an agent touches during its routine
pub struct RoutineContext<'a> {
    pub culture: &'a mut CultureStore,
    pub environment: &'a EnvironmentState,
    pub behaviors: &'a Behaviors,
    pub config: &'a SocietyConfig,
    pub rules: &'a mut Vec<String>,
    pub events: &'a mut EventBuffer,
    pub rng: &'a mut SmallRng,
    pub tick: u64,
}

/// Requests the routine leaves for the world to carry out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutineOutcome {
    pub check_revolution: bool,
    pub spawn_child: bool,
}

/// Run one tick of agent `idx`'s behavior.
pub fn run_agent_routine(idx: usize, agents: &mut [Agent], ctx: &mut RoutineContext<'_>) -> RoutineOutcome {
    let mut outcome = RoutineOutcome::default();
    let config: &SocietyConfig = ctx.config;
    let behavior = &config.behavior;

    feel_environment(&mut agents[idx], ctx);

    if chance(ctx.rng, behavior.role_assignment) {
        let agent = &mut agents[idx];
        let role = ctx.behaviors.roles.assign_role(agent, ctx.rng);
        debug!(agent = %agent.id, %role, "role assigned");
        ctx.events.push(
            ctx.tick,
            EventKind::RoleAssigned {
                agent_id: agent.id.clone(),
                role: role.to_string(),
            },
        );
    }

    if chance(ctx.rng, behavior.imitation) {
        if let Some(other) = choose_other(agents, idx, ctx.rng) {
            if let Some((agent, other)) = pair_mut(agents, idx, other) {
                ctx.behaviors.roles.imitate(agent, other);
            }
        }
    }

    if chance(ctx.rng, behavior.artifact_creation) {
        let agent = &agents[idx];
        let content = format!("artifact from {} #{}", agent.id, ctx.rng.gen_range(1..=1000));
        let handle = ctx.culture.add(content, agent.id.as_str(), Vec::<String>::new());
        ctx.events.push(
            ctx.tick,
            EventKind::ArtifactCreated {
                artifact_id: handle.id.0,
                author_id: handle.author_id.clone(),
                content: handle.content.clone(),
            },
        );
    }

    if chance(ctx.rng, behavior.rule_authorship) {
        let agent = &mut agents[idx];
        let rule = format!("New rule from {}: do not interrupt elders", agent.id);
        agent.rules.push(rule.clone());
        ctx.rules.push(rule.clone());
        ctx.events.push(
            ctx.tick,
            EventKind::RuleAuthored {
                author_id: agent.id.clone(),
                rule,
            },
        );
    }

    if chance(ctx.rng, behavior.synthesis) {
        synthesize_with_partner(idx, agents, ctx);
    }

    if chance(ctx.rng, behavior.revolution_check) {
        outcome.check_revolution = true;
    }

    let agent = &mut agents[idx];
    let joy_drift = symmetric(ctx.rng, behavior.emotion_drift);
    let sadness_drift = symmetric(ctx.rng, behavior.emotion_drift);
    agent.emotions.adjust(JOY, joy_drift);
    agent.emotions.adjust(SADNESS, sadness_drift);

    if behavior.dream_interval > 0 && agent.age % behavior.dream_interval == 0 {
        ctx.behaviors.dreams.dream(agent, ctx.rng);
    }

    if chance(ctx.rng, behavior.reflection) {
        ctx.behaviors.reflection.reflect(agent, ctx.rng);
    }

    agent.record_diary();
    agent.age += 1;

    if agent.generation > 0 && chance(ctx.rng, behavior.inheritance) {
        outcome.spawn_child = true;
    }

    outcome
}

fn feel_environment(agent: &mut Agent, ctx: &RoutineContext<'_>) {
    let env = &ctx.config.environment;
    if ctx.environment.resources < env.scarcity_threshold {
        agent.emotions.adjust(SADNESS, env.scarcity_sadness);
    }
    if ctx.environment.stress_level > env.stress_threshold {
        agent.emotions.adjust(SADNESS, env.stress_sadness);
    }
}

fn synthesize_with_partner(idx: usize, agents: &mut [Agent], ctx: &mut RoutineContext<'_>) {
    let Some(other) = choose_other(agents, idx, ctx.rng) else {
        return;
    };
    let (agent, partner) = (&agents[idx], &agents[other]);
    let (Some(mine), Some(theirs)) = (
        agent.artifacts.choose(ctx.rng).map(ArtifactHandle::clone),
        partner.artifacts.choose(ctx.rng).map(ArtifactHandle::clone),
    ) else {
        return;
    };

    let draft = ctx
        .behaviors
        .synthesis
        .synthesize(&mine, &theirs, &agent.id, &partner.id);
    let hybrid = ctx.culture.add_draft(draft);
    debug!(artifact = hybrid.id.0, content = %hybrid.content, "artifacts synthesized");
    ctx.events.push(
        ctx.tick,
        EventKind::ArtifactSynthesized {
            artifact_id: hybrid.id.0,
            author_id: hybrid.author_id.clone(),
            content: hybrid.content.clone(),
            parents: [mine.id.0, theirs.id.0],
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::environment::Environment;
    use crate::config::BehaviorConfig;
    use rand::SeedableRng;

    fn certain() -> SocietyConfig {
        let mut config = SocietyConfig::default();
        config.behavior = BehaviorConfig {
            role_assignment: 1.0,
            imitation: 1.0,
            artifact_creation: 1.0,
            rule_authorship: 1.0,
            synthesis: 1.0,
            revolution_check: 1.0,
            emotion_drift: 0.0,
            dream_interval: 1,
            dream_empathy_gain: 0.2,
            reflection: 1.0,
            inheritance: 1.0,
        };
        config
    }

    fn run(config: &SocietyConfig, agents: &mut [Agent], state: &EnvironmentState) -> (RoutineOutcome, CultureStore, Vec<String>, EventBuffer) {
        let behaviors = Behaviors::from_config(config);
        let mut culture = CultureStore::new(config.culture.clone());
        let mut rules = Vec::new();
        let mut events = EventBuffer::new();
        let mut rng = SmallRng::seed_from_u64(11);
        let outcome = {
            let mut ctx = RoutineContext {
                culture: &mut culture,
                environment: state,
                behaviors: &behaviors,
                config,
                rules: &mut rules,
                events: &mut events,
                rng: &mut rng,
                tick: 1,
            };
            run_agent_routine(0, agents, &mut ctx)
        };
        (outcome, culture, rules, events)
    }

    #[test]
    fn test_every_branch_fires_when_certain() {
        let config = certain();
        let mut agents = vec![Agent::new("agent_0"), Agent::new("agent_1")];
        agents[0].generation = 1;
        agents[0].memory.push("first light".to_string());
        let state = Environment::new(config.environment.clone()).state();

        let (outcome, culture, rules, _) = run(&config, &mut agents, &state);

        let agent = &agents[0];
        assert!(agent.role.is_some());
        assert!(agent.memory.contains(&"imitated agent_1".to_string()));
        assert_eq!(culture.len(), 1);
        assert_eq!(rules, vec!["New rule from agent_0: do not interrupt elders"]);
        assert_eq!(agent.rules, rules);
        assert!(outcome.check_revolution);
        assert!(outcome.spawn_child);
        assert!(agent.goal.is_some());
        assert_eq!(agent.diary.len(), 1);
        assert_eq!(agent.age, 1);
        assert!(agent.memory.iter().any(|m| m.starts_with("dream of: ")));
    }

    #[test]
    fn test_first_generation_never_asks_for_children() {
        let config = certain();
        let mut agents = vec![Agent::new("agent_0")];
        let state = Environment::new(config.environment.clone()).state();

        let (outcome, _, _, _) = run(&config, &mut agents, &state);
        assert!(!outcome.spawn_child);
    }

    #[test]
    fn test_hard_times_bring_sadness() {
        let mut config = SocietyConfig::default();
        config.behavior = BehaviorConfig {
            role_assignment: 0.0,
            imitation: 0.0,
            artifact_creation: 0.0,
            rule_authorship: 0.0,
            synthesis: 0.0,
            revolution_check: 0.0,
            emotion_drift: 0.0,
            dream_interval: 0,
            dream_empathy_gain: 0.0,
            reflection: 0.0,
            inheritance: 0.0,
        };
        let state = EnvironmentState {
            resources: 150,
            stress_level: 0.8,
            recent_events: Vec::new(),
        };
        let mut agents = vec![Agent::new("agent_0")];

        run(&config, &mut agents, &state);

        assert!((agents[0].sadness() - 0.65).abs() < 1e-6);
        assert_eq!(agents[0].diary[0].emotions.level(SADNESS), agents[0].sadness());
    }

    #[test]
    fn test_synthesis_adds_hybrid_to_culture() {
        let mut config = certain();
        config.behavior.artifact_creation = 0.0;
        let mut agents = vec![Agent::new("agent_0"), Agent::new("agent_1")];
        let mut seed_store = CultureStore::new(config.culture.clone());
        agents[0].artifacts.push(seed_store.add("first artifact here", "x", ["a"]));
        agents[1].artifacts.push(seed_store.add("second artifact", "y", ["b"]));
        let state = Environment::new(config.environment.clone()).state();

        let (_, culture, _, events) = run(&config, &mut agents, &state);

        let hybrid = culture.iter().next().unwrap();
        assert_eq!(hybrid.content(), "first arti...+second art...");
        assert_eq!(hybrid.identity().author_id, "agent_0&agent_1");
        assert!(events
            .iter()
            .any(|e| e.kind.name() == "artifact_synthesized"));
    }
}
