//! End-of-frame reactions to demo events.
//!
//! Singleton policy: a handler that cannot resolve the player or the game state
//! logs a warning and skips the rest of that event. Nothing here panics.

use tracing::{debug, info, warn};

use crate::{
    ecs::{ComponentType, Entity, World},
    error::EcsError,
};

use super::{
    components::{Enemy, GameState, Health, Player, Wallet},
    events::{Damage, EnemyKilled, EnemyReachedEnd, EntityDestroyed, GameOver},
};

pub fn install(world: &mut World) {
    world.register_event_handler(on_enemy_reached_end);
    world.register_event_handler(on_damage);
    world.register_event_handler(on_game_over);
}

pub fn player(world: &World) -> Result<Entity, EcsError> {
    world.single(&[
        ComponentType::of::<Player>(),
        ComponentType::of::<Health>(),
        ComponentType::of::<Wallet>(),
    ])
}

fn game_state_mut(world: &mut World) -> Option<&mut GameState> {
    match world.single_with::<GameState>() {
        Ok(state) => world.get_component_mut::<GameState>(state),
        Err(err) => {
            warn!(%err, "game state unavailable");
            None
        }
    }
}

pub fn on_enemy_reached_end(world: &mut World, event: &EnemyReachedEnd) {
    let Some(kind) = world.get_component::<Enemy>(event.enemy).map(|enemy| enemy.kind) else {
        debug!(enemy = %event.enemy, "leaked enemy already removed");
        return;
    };
    world.remove_entity(event.enemy);
    if let Some(state) = game_state_mut(world) {
        state.enemies_leaked += 1;
    }

    let player = match player(world) {
        Ok(player) => player,
        Err(err) => {
            warn!(%err, "no player to damage for leaked enemy");
            return;
        }
    };
    let Some(health) = world.get_component_mut::<Health>(player) else {
        return;
    };
    health.current -= kind.player_damage();
    let remaining = health.current;
    debug!(?kind, remaining, "enemy reached the end of the path");
    if remaining > 0.0 {
        return;
    }

    if let Some(state) = game_state_mut(world) {
        if !state.game_over {
            state.game_over = true;
            world.queue_event(GameOver);
        }
    }
}

pub fn on_damage(world: &mut World, event: &Damage) {
    let Some(health) = world.get_component_mut::<Health>(event.target) else {
        return;
    };
    health.current -= event.amount;
    if !health.is_depleted() {
        return;
    }

    let enemy = world.get_component::<Enemy>(event.target).copied();
    world.remove_entity(event.target);
    world.queue_event(EntityDestroyed {
        entity: event.target,
    });

    let Some(enemy) = enemy else {
        return;
    };
    if let Some(state) = game_state_mut(world) {
        state.enemies_killed += 1;
    }
    match player(world) {
        Ok(player) => {
            if let Some(wallet) = world.get_component_mut::<Wallet>(player) {
                wallet.money += enemy.reward;
            }
        }
        Err(err) => warn!(%err, "no wallet to credit for kill"),
    }
    world.queue_event(EnemyKilled {
        kind: enemy.kind,
        reward: enemy.reward,
    });
}

pub fn on_game_over(world: &mut World, _event: &GameOver) {
    info!(frame = world.frame(), "game over");
}
