//! World
//!
//! Owns the population, culture store, environment, relationships, and rule
//! list of one simulation run, together with the run's only random generator.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use society_events::{EventKind, SocietyEvent, WorldSnapshot};

use crate::behaviors::{AgentMode, Behaviors, ModeParams, Uprising};
use crate::components::agent::Agent;
use crate::components::artifact::{ArtifactDraft, ArtifactHandle};
use crate::components::culture::CultureStore;
use crate::components::environment::Environment;
use crate::components::social::RelationshipGraph;
use crate::config::SocietyConfig;
use crate::error::{Result, SocietyError};
use crate::events::EventBuffer;
use crate::output::save::{AgentRecord, SaveDocument, SAVE_FORMAT_VERSION};
use crate::systems::{
    agent_id, interact, prune, run_agent_routine, sample_living_pair, RoutineContext,
};
use crate::SimRng;

/// Result of handing an outside artifact to the society
#[derive(Debug, Clone)]
pub struct Injection {
    pub artifact: ArtifactHandle,
    /// Living agent that received it, if anyone was alive
    pub recipient: Option<String>,
}

pub struct World {
    config: SocietyConfig,
    run_id: Uuid,
    seed: u64,
    tick: u64,
    rng: SimRng,
    behaviors: Behaviors,
    agents: Vec<Agent>,
    culture: CultureStore,
    environment: Environment,
    relationships: RelationshipGraph,
    rules: Vec<String>,
    generation: u32,
    next_agent_index: u64,
    events: EventBuffer,
}

impl World {
    /// Build a world with `config.simulation.initial_agents` first-generation agents.
    pub fn new(config: SocietyConfig) -> Self {
        let seed = config.simulation.seed;
        let mut world = Self {
            run_id: run_id_for(seed),
            seed,
            tick: 0,
            rng: SimRng::seed_from_u64(seed),
            behaviors: Behaviors::from_config(&config),
            agents: Vec::new(),
            culture: CultureStore::new(config.culture.clone()),
            environment: Environment::new(config.environment.clone()),
            relationships: RelationshipGraph::new(),
            rules: Vec::new(),
            generation: 0,
            next_agent_index: 0,
            events: EventBuffer::new(),
            config,
        };
        for _ in 0..world.config.simulation.initial_agents {
            let id = world.allocate_agent_id();
            world.agents.push(Agent::new(id));
        }
        world
    }

    /// Default tuning with the given seed and population size
    pub fn with_seed(seed: u64, agents: usize) -> Self {
        let mut config = SocietyConfig::default();
        config.simulation.seed = seed;
        config.simulation.initial_agents = agents;
        Self::new(config)
    }

    /// Advance one tick.
    pub fn step(&mut self) {
        self.tick += 1;
        let tick = self.tick;

        if let Some(event) = self.environment.fluctuate(&mut self.rng.0) {
            debug!(tick, %event, "environment event");
            self.events.push(
                tick,
                EventKind::EnvironmentShift {
                    event: event.to_string(),
                },
            );
        }
        let environment = self.environment.state();
        let removal = self.config.lifecycle.removal_sadness;

        // Children born this tick start acting next tick
        let population = self.agents.len();
        for idx in 0..population {
            if !self.agents[idx].alive || !self.agents[idx].evaluate_viability(removal) {
                continue;
            }

            let outcome = {
                let mut ctx = RoutineContext {
                    culture: &mut self.culture,
                    environment: &environment,
                    behaviors: &self.behaviors,
                    config: &self.config,
                    rules: &mut self.rules,
                    events: &mut self.events,
                    rng: &mut self.rng.0,
                    tick,
                };
                run_agent_routine(idx, &mut self.agents, &mut ctx)
            };

            if outcome.check_revolution {
                self.check_revolution();
            }
            if outcome.spawn_child {
                self.spawn_child(idx);
            }
            self.agents[idx].evaluate_viability(removal);
        }

        let bond = self.config.social.interaction_bond;
        for _ in 0..self.agents.len() {
            let Some((a, b)) = sample_living_pair(&self.agents, &mut self.rng.0) else {
                break;
            };
            interact(a, b, &mut self.agents, &mut self.culture, &mut self.rng.0, tick);
            self.relationships
                .strengthen(&self.agents[a].id, &self.agents[b].id, bond);
        }

        for forgotten in self.culture.decay() {
            self.events.push(
                tick,
                EventKind::ArtifactForgotten {
                    artifact_id: forgotten.id.0,
                    content: forgotten.content.clone(),
                },
            );
        }
        self.relationships.decay(self.config.social.bond_decay);

        prune(&mut self.agents, &mut self.relationships, &mut self.events, tick);
    }

    /// Spawn a child of the agent `parent_id`, seeded with the tail of its
    /// memory and carried artifacts. Returns the child's id.
    pub fn inherit_experience(&mut self, parent_id: &str) -> Result<String> {
        let idx = self.index_of(parent_id)?;
        Ok(self.spawn_child(idx))
    }

    fn spawn_child(&mut self, parent_idx: usize) -> String {
        let id = self.allocate_agent_id();
        let lifecycle = &self.config.lifecycle;
        let child = Agent::inherit(
            id.clone(),
            &self.agents[parent_idx],
            lifecycle.inherited_memories,
            lifecycle.inherited_artifacts,
        );
        self.generation = self.generation.max(child.generation);

        let parent_id = self.agents[parent_idx].id.clone();
        debug!(agent = %id, parent = %parent_id, generation = child.generation, "agent born");
        self.events.push(
            self.tick,
            EventKind::AgentBorn {
                agent_id: id.clone(),
                parent_id,
                generation: child.generation,
            },
        );
        self.agents.push(child);
        id
    }

    fn allocate_agent_id(&mut self) -> String {
        let id = agent_id(self.next_agent_index);
        self.next_agent_index += 1;
        id
    }

    pub fn add_rule(&mut self, rule: impl Into<String>) {
        self.rules.push(rule.into());
    }

    /// Look for an artifact carried by most of the living population and,
    /// if one is found, turn it into a rule.
    pub fn check_revolution(&mut self) -> Option<Uprising> {
        let uprising = self.behaviors.revolution.check(&self.agents)?;
        info!(
            content = %uprising.content,
            carriers = uprising.carriers,
            population = uprising.population,
            "revolution"
        );
        self.add_rule(uprising.rule());
        self.events.push(
            self.tick,
            EventKind::Revolution {
                content: uprising.content.clone(),
                carriers: uprising.carriers,
                population: uprising.population,
            },
        );
        Some(uprising)
    }

    /// Add an artifact to the culture and hand it to one random living agent.
    pub fn inject_artifact(&mut self, draft: ArtifactDraft) -> Injection {
        let author = draft.author_id.clone();
        let artifact = self.culture.add_draft(draft);

        let living: Vec<usize> = (0..self.agents.len())
            .filter(|&i| self.agents[i].alive)
            .collect();
        let recipient = living.choose(&mut self.rng.0).copied().map(|idx| {
            let agent = &mut self.agents[idx];
            agent.perceive(
                format!("received an artifact from {}", author),
                Some(ArtifactHandle::clone(&artifact)),
            );
            agent.id.clone()
        });
        if let Some(id) = &recipient {
            self.culture.spread(artifact.id, id, self.tick, &mut self.rng.0);
        }

        self.events.push(
            self.tick,
            EventKind::ArtifactInjected {
                artifact_id: artifact.id.0,
                content: artifact.content.clone(),
                recipient: recipient.clone(),
            },
        );
        Injection { artifact, recipient }
    }

    /// Apply a named mode to an agent. Unknown names resolve to balanced.
    pub fn evolve_agent(&mut self, agent_id: &str, mode: &str) -> Result<ModeParams> {
        let agent = self
            .agent_mut(agent_id)
            .ok_or_else(|| SocietyError::AgentNotFound(agent_id.to_string()))?;
        let mode = AgentMode::from_name(mode);
        debug!(agent = %agent.id, %mode, "mode applied");
        Ok(mode.apply(agent))
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            num_agents: self.agents.len(),
            rules: self.rules.clone(),
            culture: self.culture.snapshot(),
            agents: self.agents.iter().map(|a| a.id.clone()).collect(),
            generation: self.generation,
            environment: self.environment.snapshot(),
        }
    }

    /// Capture everything needed to resume this run.
    pub fn to_document(&self) -> SaveDocument {
        SaveDocument {
            version: SAVE_FORMAT_VERSION,
            run_id: self.run_id,
            seed: self.seed,
            tick: self.tick,
            generation: self.generation,
            next_agent_index: self.next_agent_index,
            next_artifact_id: self.culture.next_artifact_id(),
            rules: self.rules.clone(),
            environment: self.environment.snapshot(),
            culture: self.culture.snapshot(),
            agents: self.agents.iter().map(AgentRecord::from_agent).collect(),
            relationships: self.relationships.clone(),
        }
    }

    /// Replace this world's state with a saved one. The document is fully
    /// validated first; on error nothing changes.
    pub fn load_document(&mut self, document: SaveDocument) -> Result<()> {
        let restored = document.rebuild()?;
        let mut environment = Environment::new(self.config.environment.clone());
        environment.restore(&document.environment)?;

        let id_floor = restored
            .agents
            .iter()
            .filter_map(|a| a.id.strip_prefix("agent_")?.parse::<u64>().ok())
            .map(|n| n + 1)
            .max()
            .unwrap_or(0);
        let deepest = restored.agents.iter().map(|a| a.generation).max().unwrap_or(0);

        self.culture.restore(restored.artifacts, document.next_artifact_id);
        self.environment = environment;
        self.agents = restored.agents;
        self.relationships = document.relationships;
        self.rules = document.rules;
        self.generation = document.generation.max(deepest);
        self.next_agent_index = document.next_agent_index.max(id_floor);
        self.run_id = document.run_id;
        self.seed = document.seed;
        self.tick = document.tick;
        self.rng = SimRng::seed_from_u64(document.seed ^ document.tick);
        self.events.clear();

        info!(
            tick = self.tick,
            agents = self.agents.len(),
            artifacts = self.culture.len(),
            "world restored"
        );
        Ok(())
    }

    /// Parse a save document from JSON and load it.
    pub fn load_snapshot(&mut self, json: &str) -> Result<()> {
        let document = SaveDocument::from_json(json)?;
        self.load_document(document)
    }

    pub fn drain_events(&mut self) -> Vec<SocietyEvent> {
        self.events.drain()
    }

    fn index_of(&self, agent_id: &str) -> Result<usize> {
        self.agents
            .iter()
            .position(|a| a.id == agent_id)
            .ok_or_else(|| SocietyError::AgentNotFound(agent_id.to_string()))
    }

    pub fn agent(&self, agent_id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == agent_id)
    }

    pub fn agent_mut(&mut self, agent_id: &str) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == agent_id)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn culture(&self) -> &CultureStore {
        &self.culture
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    pub fn relationships(&self) -> &RelationshipGraph {
        &self.relationships
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn config(&self) -> &SocietyConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Deepest lineage generation seen so far
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Run ids are derived from the seed so that same-seed runs are identical
/// down to their save documents.
fn run_id_for(seed: u64) -> Uuid {
    let mut rng = SimRng::seed_from_u64(seed);
    uuid::Builder::from_random_bytes(rng.0.gen()).into_uuid()
}
