//! Headless tower-defense sample built on the public ECS API.

pub mod components;
pub mod events;
pub mod handlers;
pub mod systems;

use tracing::info;

use crate::{
    config::Config,
    ecs::{World, WorldBuilder},
};
use components::{
    BoundingBox, Enemy, GameState, Health, Path, PathFollow, Player, Position, Projectile, Tower,
    Velocity, Wallet,
};
use systems::{
    CollisionSystem, EnemyMovementSystem, MovementSystem, ProjectileSystem, TowerFireSystem,
    WaveSystem,
};

pub const MAIN_PATH: &str = "main";

/// Assemble a playable world: schema, systems, handlers, then the path, the
/// towers, the player and the game-state singleton.
pub fn build_world(config: &Config) -> World {
    let mut world = WorldBuilder::new(&config.world)
        .register_component::<Position>()
        .register_component::<Velocity>()
        .register_component::<Health>()
        .register_component::<Enemy>()
        .register_component::<Path>()
        .register_component::<PathFollow>()
        .register_component::<Player>()
        .register_component::<Wallet>()
        .register_component::<GameState>()
        .register_component::<Tower>()
        .register_component::<Projectile>()
        .register_component::<BoundingBox>()
        .with_system(WaveSystem::new(&config.demo, MAIN_PATH))
        .with_system(TowerFireSystem::new(&config.demo))
        .with_system(ProjectileSystem::new())
        .with_system(MovementSystem::new())
        .with_system(EnemyMovementSystem::new())
        .with_system(CollisionSystem::new())
        .build();
    handlers::install(&mut world);

    let path = world.create_entity();
    world.add_component(
        path,
        Path {
            id: MAIN_PATH.to_string(),
            waypoints: config
                .demo
                .path
                .iter()
                .map(|[x, y]| Position::new(*x, *y))
                .collect(),
        },
    );

    for tower_config in &config.demo.towers {
        let tower = world.create_entity();
        let [x, y] = tower_config.position;
        world.add_component(tower, Position::new(x, y));
        world.add_component(
            tower,
            Tower::new(tower_config.damage, tower_config.range, tower_config.cooldown),
        );
    }

    let player = world.create_entity();
    world.add_component(player, Player);
    world.add_component(player, Health::full(config.demo.player_health));
    world.add_component(
        player,
        Wallet {
            money: config.demo.starting_money,
        },
    );

    let state = world.create_entity();
    world.add_component(state, GameState::default());

    info!(
        systems = ?world.system_names(),
        waypoints = config.demo.path.len(),
        towers = config.demo.towers.len(),
        "demo world assembled"
    );
    world
}

/// Current game state, if exactly one exists.
pub fn game_state(world: &World) -> Option<GameState> {
    let state = world.single_with::<GameState>().ok()?;
    world.get_component::<GameState>(state).copied()
}
