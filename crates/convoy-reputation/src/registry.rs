use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use convoy_types::{AgentId, ConvoyError, Interaction, Result};

/// Per-agent state held by the registry.
///
/// Both fields are copy-on-write: appends clone the vector only while a snapshot still
/// shares it.
#[derive(Debug, Clone, Default)]
struct AgentRecord {
    log: Arc<Vec<Interaction>>,
    peers: Arc<BTreeSet<AgentId>>,
}

/// Owns every agent's interaction log and neighbor set, keyed by id.
///
/// Agents refer to each other by id only. Writers to the same agent are serialized by the
/// map's shard locks; queries run against a [`NetworkSnapshot`] and never hold a lock.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: DashMap<AgentId, AgentRecord>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: DashMap::new(),
        }
    }

    /// Register an agent. Returns false if it was already known.
    pub fn register(&self, id: impl Into<AgentId>) -> bool {
        match self.agents.entry(id.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(AgentRecord::default());
                true
            }
        }
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.agents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Append a record to `owner`'s log. The record itself is not inspected.
    pub fn add_interaction(&self, owner: &AgentId, record: Interaction) -> Result<()> {
        let mut agent = self
            .agents
            .get_mut(owner)
            .ok_or_else(|| ConvoyError::AgentNotFound(owner.clone()))?;
        tracing::trace!(
            owner = %owner,
            sender = %record.sender,
            recipient = %record.recipient,
            "appending interaction"
        );
        Arc::make_mut(&mut agent.log).push(record);
        Ok(())
    }

    /// Append a record to its sender's log.
    pub fn ingest(&self, record: Interaction) -> Result<()> {
        let owner = record.sender.clone();
        self.add_interaction(&owner, record)
    }

    /// Name `peer` as a one-hop neighbor of `owner`. The peer does not have to be registered
    /// yet; unresolvable peers are skipped when recommendations are gathered.
    pub fn add_peer(&self, owner: &AgentId, peer: impl Into<AgentId>) -> Result<()> {
        let mut agent = self
            .agents
            .get_mut(owner)
            .ok_or_else(|| ConvoyError::AgentNotFound(owner.clone()))?;
        Arc::make_mut(&mut agent.peers).insert(peer.into());
        Ok(())
    }

    /// Current log of an agent.
    pub fn interactions(&self, id: &AgentId) -> Option<Arc<Vec<Interaction>>> {
        self.agents.get(id).map(|agent| Arc::clone(&agent.log))
    }

    /// Immutable view of every agent's log and neighbor set.
    ///
    /// Each log is captured whole, but shards are visited one at a time: pause ingestion
    /// before taking the snapshot if the round needs a single point in time across agents.
    /// Only reference counts are bumped.
    pub fn snapshot(&self) -> NetworkSnapshot {
        let agents = self
            .agents
            .iter()
            .map(|entry| {
                let view = AgentView {
                    id: entry.key().clone(),
                    log: Arc::clone(&entry.value().log),
                    peers: Arc::clone(&entry.value().peers),
                };
                (entry.key().clone(), view)
            })
            .collect();
        NetworkSnapshot { agents }
    }
}

/// Read-only view of one agent inside a snapshot.
#[derive(Debug, Clone)]
pub struct AgentView {
    id: AgentId,
    log: Arc<Vec<Interaction>>,
    peers: Arc<BTreeSet<AgentId>>,
}

impl AgentView {
    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn log(&self) -> &[Interaction] {
        &self.log
    }

    pub fn has_peer(&self, id: &AgentId) -> bool {
        self.peers.contains(id)
    }
}

/// Frozen state of the whole network, as seen by one round of queries.
#[derive(Debug, Clone, Default)]
pub struct NetworkSnapshot {
    agents: HashMap<AgentId, AgentView>,
}

impl NetworkSnapshot {
    pub fn get(&self, id: &AgentId) -> Option<&AgentView> {
        self.agents.get(id)
    }

    pub fn agent(&self, id: &AgentId) -> Result<&AgentView> {
        self.get(id)
            .ok_or_else(|| ConvoyError::AgentNotFound(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
