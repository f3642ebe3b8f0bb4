use tracing::warn;

use crate::{
    demo::{
        components::{Enemy, Health, Path, PathFollow, Position},
        events::EnemyReachedEnd,
    },
    ecs::{ComponentType, System, World},
};

enum Step {
    Move(Position),
    Arrive(Position),
    ReachedEnd,
}

/// Walks enemies along their path, one segment at a time.
///
/// Only enemies that still carry `Health` move.
/// A step that would carry an enemy past the next waypoint stops on the waypoint
/// instead. An enemy already on its last waypoint raises `EnemyReachedEnd` every
/// frame until something removes it.
pub struct EnemyMovementSystem;

impl EnemyMovementSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnemyMovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn find_path<'w>(world: &'w World, id: &str) -> Option<&'w Path> {
    world
        .components()
        .storage::<Path>()?
        .iter()
        .map(|(_, path)| path)
        .find(|path| path.id == id)
}

fn next_step(position: Position, speed: f64, follow: &PathFollow, path: &Path, dt: f64) -> Step {
    let index = follow.waypoint_index;
    if index + 1 >= path.waypoints.len() {
        return Step::ReachedEnd;
    }
    let start = path.waypoints[index];
    let end = path.waypoints[index + 1];
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let distance = speed * dt;
    let moved = Position::new(
        position.x + distance * angle.cos(),
        position.y + distance * angle.sin(),
    );
    if position.distance(moved) >= position.distance(end) {
        Step::Arrive(end)
    } else {
        Step::Move(moved)
    }
}

impl System for EnemyMovementSystem {
    fn name(&self) -> &str {
        "enemy_movement"
    }

    fn update(&mut self, world: &mut World, dt: f64) {
        let runners = world.entities_with_all(&[
            ComponentType::of::<Position>(),
            ComponentType::of::<Enemy>(),
            ComponentType::of::<Health>(),
            ComponentType::of::<PathFollow>(),
        ]);
        for runner in runners {
            let (Some(position), Some(enemy), Some(follow)) = (
                world.get_component::<Position>(runner),
                world.get_component::<Enemy>(runner),
                world.get_component::<PathFollow>(runner),
            ) else {
                continue;
            };
            let Some(path) = find_path(world, &follow.path_id) else {
                warn!(%runner, path = %follow.path_id, "enemy follows a path that does not exist");
                continue;
            };
            let step = next_step(*position, enemy.speed, follow, path, dt);

            match step {
                Step::ReachedEnd => world.queue_event(EnemyReachedEnd { enemy: runner }),
                Step::Arrive(waypoint) => {
                    if let Some(follow) = world.get_component_mut::<PathFollow>(runner) {
                        follow.waypoint_index += 1;
                    }
                    if let Some(position) = world.get_component_mut::<Position>(runner) {
                        *position = waypoint;
                    }
                }
                Step::Move(moved) => {
                    if let Some(position) = world.get_component_mut::<Position>(runner) {
                        *position = moved;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::components::EnemyKind;

    fn spawn_runner(world: &mut World, speed: f64) -> crate::ecs::Entity {
        let runner = world.create_entity();
        world.add_component(
            runner,
            Enemy {
                kind: EnemyKind::Basic,
                speed,
                reward: 0.0,
            },
        );
        world.add_component(runner, Position::new(0.0, 0.0));
        world.add_component(runner, Health::full(10.0));
        world.add_component(
            runner,
            PathFollow {
                path_id: "test-path".into(),
                waypoint_index: 0,
            },
        );
        runner
    }

    fn spawn_path(world: &mut World) {
        let path = world.create_entity();
        world.add_component(
            path,
            Path {
                id: "test-path".into(),
                waypoints: vec![
                    Position::new(0.0, 0.0),
                    Position::new(10.0, 0.0),
                    Position::new(10.0, 10.0),
                ],
            },
        );
    }

    #[test]
    fn test_step_snaps_to_waypoint() {
        let mut world = World::new();
        world.add_system(EnemyMovementSystem::new());
        spawn_path(&mut world);
        let runner = spawn_runner(&mut world, 4.0);

        world.update(2.0);
        let position = *world.get_component::<Position>(runner).unwrap();
        assert!((position.x - 8.0).abs() < 1e-9);

        world.update(2.0);
        assert_eq!(world.get_component::<Position>(runner), Some(&Position::new(10.0, 0.0)));
        assert_eq!(world.get_component::<PathFollow>(runner).unwrap().waypoint_index, 1);
    }

    #[test]
    fn test_missing_path_leaves_enemy_alone() {
        let mut world = World::new();
        world.add_system(EnemyMovementSystem::new());
        let runner = spawn_runner(&mut world, 1.0);

        world.update(1.0);
        assert_eq!(world.get_component::<Position>(runner), Some(&Position::new(0.0, 0.0)));
        assert_eq!(world.pending_events(), 0);
    }

    #[test]
    fn test_enemy_without_health_stays_put() {
        let mut world = World::new();
        world.add_system(EnemyMovementSystem::new());
        spawn_path(&mut world);
        let runner = spawn_runner(&mut world, 1.0);
        world.remove_component::<Health>(runner);

        world.update(1.0);
        assert_eq!(world.get_component::<Position>(runner), Some(&Position::new(0.0, 0.0)));
        assert_eq!(world.get_component::<PathFollow>(runner).unwrap().waypoint_index, 0);
    }
}
