use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::{
    config::DemoConfig,
    demo::components::{
        BoundingBox, Enemy, EnemyKind, GameState, Health, Path, PathFollow, Position,
    },
    ecs::{System, World},
};

const ENEMY_SIZE: f64 = 1.0;

/// Spawns an enemy at the head of a path whenever the cooldown elapses.
///
/// The cooldown shrinks after every spawn down to a floor. Spawning stops for
/// good once the game is over.
pub struct WaveSystem {
    rng: ChaCha8Rng,
    path_id: String,
    cooldown: f64,
    cooldown_step: f64,
    min_cooldown: f64,
    elapsed: f64,
    spawned: u64,
}

impl WaveSystem {
    pub fn new(config: &DemoConfig, path_id: impl Into<String>) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            path_id: path_id.into(),
            cooldown: config.wave_cooldown,
            cooldown_step: config.cooldown_step,
            min_cooldown: config.min_cooldown,
            elapsed: 0.0,
            spawned: 0,
        }
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn cooldown(&self) -> f64 {
        self.cooldown
    }

    fn pick_kind(&mut self) -> EnemyKind {
        match self.rng.gen_range(0..10) {
            0..=5 => EnemyKind::Basic,
            6..=8 => EnemyKind::Fast,
            _ => EnemyKind::Tank,
        }
    }

    fn spawn_point(&self, world: &World) -> Option<Position> {
        world
            .components()
            .storage::<Path>()?
            .iter()
            .find(|(_, path)| path.id == self.path_id)
            .and_then(|(_, path)| path.waypoints.first().copied())
    }
}

impl System for WaveSystem {
    fn name(&self) -> &str {
        "wave"
    }

    fn update(&mut self, world: &mut World, dt: f64) {
        let state = match world.single_with::<GameState>() {
            Ok(state) => state,
            Err(err) => {
                warn!(%err, "wave system skipping frame");
                return;
            }
        };
        if world
            .get_component::<GameState>(state)
            .is_some_and(|s| s.game_over)
        {
            return;
        }

        self.elapsed += dt;
        if self.elapsed < self.cooldown {
            return;
        }
        self.elapsed -= self.cooldown;

        let Some(start) = self.spawn_point(world) else {
            warn!(path = %self.path_id, "no spawn point; path missing or empty");
            return;
        };
        let kind = self.pick_kind();
        let enemy = world.create_entity();
        world.add_component(enemy, Enemy::of_kind(kind));
        world.add_component(enemy, Position::new(start.x, start.y));
        world.add_component(enemy, Health::full(kind.max_health()));
        world.add_component(enemy, BoundingBox::square(ENEMY_SIZE));
        world.add_component(
            enemy,
            PathFollow {
                path_id: self.path_id.clone(),
                waypoint_index: 0,
            },
        );
        if let Some(state) = world.get_component_mut::<GameState>(state) {
            state.enemies_spawned += 1;
        }

        self.spawned += 1;
        self.cooldown = (self.cooldown - self.cooldown_step).max(self.min_cooldown);
        debug!(%enemy, ?kind, next_cooldown = self.cooldown, "enemy spawned");
    }
}
