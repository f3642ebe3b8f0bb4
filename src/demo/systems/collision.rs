use crate::{
    demo::{
        components::{BoundingBox, Enemy, Health, Position, Projectile},
        events::Damage,
    },
    ecs::{ComponentType, Entity, System, World},
};

/// Turns projectile hits into `Damage` events.
///
/// A projectile hits the first overlapping enemy in handle order, whether or
/// not it was aimed at it, and is removed on impact.
pub struct CollisionSystem;

impl CollisionSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn placed(world: &World, entity: Entity) -> Option<(Position, BoundingBox)> {
    Some((
        *world.get_component::<Position>(entity)?,
        *world.get_component::<BoundingBox>(entity)?,
    ))
}

impl System for CollisionSystem {
    fn name(&self) -> &str {
        "collision"
    }

    fn update(&mut self, world: &mut World, _dt: f64) {
        let enemies: Vec<(Entity, Position, BoundingBox)> = world
            .entities_with_all(&[
                ComponentType::of::<Enemy>(),
                ComponentType::of::<Health>(),
                ComponentType::of::<Position>(),
                ComponentType::of::<BoundingBox>(),
            ])
            .into_iter()
            .filter_map(|enemy| placed(world, enemy).map(|(at, bounds)| (enemy, at, bounds)))
            .collect();
        let projectiles = world.entities_with_all(&[
            ComponentType::of::<Projectile>(),
            ComponentType::of::<Position>(),
            ComponentType::of::<BoundingBox>(),
        ]);

        for entity in projectiles {
            let (Some(projectile), Some((at, bounds))) = (
                world.get_component::<Projectile>(entity).copied(),
                placed(world, entity),
            ) else {
                continue;
            };
            let hit = enemies
                .iter()
                .find(|(_, enemy_at, enemy_bounds)| bounds.overlaps(at, *enemy_bounds, *enemy_at));
            if let Some((enemy, _, _)) = hit {
                world.queue_event(Damage {
                    target: *enemy,
                    amount: projectile.damage,
                });
                world.remove_entity(entity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::demo::components::EnemyKind;

    fn spawn_enemy(world: &mut World, at: Position) -> Entity {
        let enemy = world.create_entity();
        world.add_component(enemy, Enemy::of_kind(EnemyKind::Basic));
        world.add_component(enemy, Health::full(10.0));
        world.add_component(enemy, at);
        world.add_component(enemy, BoundingBox::square(1.0));
        enemy
    }

    fn spawn_projectile(world: &mut World, at: Position, target: Entity) -> Entity {
        let projectile = world.create_entity();
        world.add_component(
            projectile,
            Projectile {
                damage: 4.0,
                speed: 1.0,
                target,
                lifetime: 1.0,
            },
        );
        world.add_component(projectile, at);
        world.add_component(projectile, BoundingBox::square(0.5));
        projectile
    }

    fn record_damage(world: &mut World) -> Rc<RefCell<Vec<Damage>>> {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let sink = hits.clone();
        world.register_event_handler(move |_world, event: &Damage| {
            sink.borrow_mut().push(*event);
        });
        hits
    }

    #[test]
    fn test_hit_queues_damage_and_removes_projectile() {
        let mut world = World::new();
        world.add_system(CollisionSystem::new());
        let hits = record_damage(&mut world);
        let enemy = spawn_enemy(&mut world, Position::new(2.0, 2.0));
        let projectile = spawn_projectile(&mut world, Position::new(2.5, 2.2), enemy);

        world.update(0.1);

        assert_eq!(
            *hits.borrow(),
            vec![Damage {
                target: enemy,
                amount: 4.0
            }]
        );
        assert!(!world.is_alive(projectile));
        assert!(world.is_alive(enemy));
    }

    #[test]
    fn test_miss_leaves_both_alone() {
        let mut world = World::new();
        world.add_system(CollisionSystem::new());
        let hits = record_damage(&mut world);
        let enemy = spawn_enemy(&mut world, Position::new(2.0, 2.0));
        let projectile = spawn_projectile(&mut world, Position::new(5.0, 2.0), enemy);

        world.update(0.1);

        assert!(hits.borrow().is_empty());
        assert!(world.is_alive(projectile));
    }

    #[test]
    fn test_projectile_hits_only_one_enemy() {
        let mut world = World::new();
        world.add_system(CollisionSystem::new());
        let hits = record_damage(&mut world);
        let first = spawn_enemy(&mut world, Position::new(0.0, 0.0));
        let second = spawn_enemy(&mut world, Position::new(0.5, 0.0));
        spawn_projectile(&mut world, Position::new(0.25, 0.0), second);

        world.update(0.1);

        assert_eq!(hits.borrow().len(), 1);
        assert_eq!(hits.borrow()[0].target, first);
    }
}
