use crate::ecs::{Entity, Event};

use super::components::EnemyKind;

/// An enemy ran out of waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyReachedEnd {
    pub enemy: Entity,
}

impl Event for EnemyReachedEnd {
    fn entity(&self) -> Option<Entity> {
        Some(self.enemy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Damage {
    pub target: Entity,
    pub amount: f64,
}

impl Event for Damage {
    fn entity(&self) -> Option<Entity> {
        Some(self.target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyKilled {
    pub kind: EnemyKind,
    pub reward: f64,
}

impl Event for EnemyKilled {}

/// An entity's health ran out and it was removed from the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDestroyed {
    pub entity: Entity,
}

impl Event for EntityDestroyed {
    fn entity(&self) -> Option<Entity> {
        Some(self.entity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOver;

impl Event for GameOver {}
