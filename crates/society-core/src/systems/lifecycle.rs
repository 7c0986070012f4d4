//! Removal of agents that did not survive the tick.

use society_events::EventKind;
use tracing::debug;

use crate::components::agent::Agent;
use crate::components::social::RelationshipGraph;
use crate::events::EventBuffer;

/// Id for the `index`th agent ever created
pub fn agent_id(index: u64) -> String {
    format!("agent_{}", index)
}

/// Drop every agent that is no longer alive, along with its relationships.
/// Returns the removed ids in population order.
pub fn prune(
    agents: &mut Vec<Agent>,
    relationships: &mut RelationshipGraph,
    events: &mut EventBuffer,
    tick: u64,
) -> Vec<String> {
    let mut removed = Vec::new();
    agents.retain(|agent| {
        if agent.alive {
            return true;
        }
        debug!(agent = %agent.id, age = agent.age, "agent removed");
        events.push(
            tick,
            EventKind::AgentRemoved {
                agent_id: agent.id.clone(),
                age: agent.age,
            },
        );
        removed.push(agent.id.clone());
        false
    });

    for id in &removed {
        relationships.remove_agent(id);
    }
    removed
}
