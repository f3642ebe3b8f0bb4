//! Entity management

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EcsError;

/// Generational entity handle.
///
/// The index names a slot; the generation is bumped every time the slot is
/// freed, so a handle kept past removal never matches a later occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    index: u64,
    generation: u32,
}

impl Entity {
    pub(crate) fn new(index: u64, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(self) -> u64 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Whether freed slots are handed out again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityIdPolicy {
    /// Reuse freed indices with a bumped generation.
    #[default]
    Recycle,
    /// Never reuse an index; ids grow for the life of the manager.
    Monotonic,
}

/// Identity allocation and liveness tracking.
///
/// A slot whose generation reaches `u32::MAX` is retired instead of recycled,
/// so no two handles ever share an index and generation.
pub struct EntityManager {
    policy: EntityIdPolicy,
    next_index: u64,
    // Highest index ever handed out.
    index_limit: u64,
    // Indexed by slot; slot 0 is never handed out.
    generations: Vec<u32>,
    free_list: Vec<u64>,
    alive: HashSet<Entity>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::with_policy(EntityIdPolicy::default())
    }

    pub fn with_policy(policy: EntityIdPolicy) -> Self {
        Self {
            policy,
            next_index: 1,
            index_limit: u64::MAX,
            generations: vec![0],
            free_list: Vec::new(),
            alive: HashSet::new(),
        }
    }

    pub fn policy(&self) -> EntityIdPolicy {
        self.policy
    }

    /// Allocate a fresh handle.
    ///
    /// # Panics
    ///
    /// Panics if all 2^64 - 1 indices have been handed out, which no real
    /// workload reaches. Use [`EntityManager::try_create_entity`] to observe
    /// exhaustion as an error.
    pub fn create_entity(&mut self) -> Entity {
        match self.try_create_entity() {
            Ok(entity) => entity,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_create_entity(&mut self) -> Result<Entity, EcsError> {
        if let Some(index) = self.free_list.pop() {
            let entity = Entity::new(index, self.generations[index as usize]);
            self.alive.insert(entity);
            return Ok(entity);
        }
        if self.next_index > self.index_limit {
            return Err(EcsError::EntityIdsExhausted {
                allocated: self.index_limit,
            });
        }
        let index = self.next_index;
        self.next_index += 1;
        self.generations.push(0);
        let entity = Entity::new(index, 0);
        self.alive.insert(entity);
        Ok(entity)
    }

    /// Evict `entity` from the live set. Removing a dead or stale handle is a no-op.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        if !self.alive.remove(&entity) {
            return false;
        }
        let slot = &mut self.generations[entity.index as usize];
        match slot.checked_add(1) {
            Some(next) => {
                *slot = next;
                if self.policy == EntityIdPolicy::Recycle {
                    self.free_list.push(entity.index);
                }
            }
            None => debug!(%entity, "generation exhausted; slot retired"),
        }
        true
    }

    pub fn has_entity(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    pub fn all_entities(&self) -> BTreeSet<Entity> {
        self.alive.iter().copied().collect()
    }

    pub fn count(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}
