use tracing::trace;

use crate::{
    demo::components::{Position, Projectile, Velocity},
    ecs::{ComponentType, System, World},
};

/// Velocity of length `speed` pointing from `from` towards `to`.
pub fn aim(from: Position, to: Position, speed: f64) -> Velocity {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    Velocity {
        x: speed * angle.cos(),
        y: speed * angle.sin(),
    }
}

/// Ages projectiles and steers each one towards its target.
///
/// Expired projectiles are removed. A projectile whose target is gone keeps its
/// last heading.
pub struct ProjectileSystem;

impl ProjectileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProjectileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ProjectileSystem {
    fn name(&self) -> &str {
        "projectile"
    }

    fn update(&mut self, world: &mut World, dt: f64) {
        let projectiles = world.entities_with_all(&[
            ComponentType::of::<Projectile>(),
            ComponentType::of::<Position>(),
        ]);
        for entity in projectiles {
            let Some(projectile) = world.get_component_mut::<Projectile>(entity) else {
                continue;
            };
            projectile.lifetime -= dt;
            if projectile.lifetime <= 0.0 {
                world.remove_entity(entity);
                trace!(%entity, "projectile expired");
                continue;
            }
            let projectile = *projectile;

            let (Some(from), Some(to)) = (
                world.get_component::<Position>(entity).copied(),
                world.get_component::<Position>(projectile.target).copied(),
            ) else {
                continue;
            };
            world.add_component(entity, aim(from, to, projectile.speed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Entity;

    fn spawn_projectile(world: &mut World, target: Entity, lifetime: f64) -> Entity {
        let projectile = world.create_entity();
        world.add_component(
            projectile,
            Projectile {
                damage: 1.0,
                speed: 2.0,
                target,
                lifetime,
            },
        );
        world.add_component(projectile, Position::new(0.0, 0.0));
        world.add_component(projectile, Velocity { x: 2.0, y: 0.0 });
        projectile
    }

    #[test]
    fn test_aim_points_at_target() {
        let velocity = aim(Position::new(1.0, 1.0), Position::new(4.0, 5.0), 10.0);

        assert!((velocity.x - 6.0).abs() < 1e-9);
        assert!((velocity.y - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_steers_towards_moving_target() {
        let mut world = World::new();
        world.add_system(ProjectileSystem::new());
        let target = world.create_entity();
        world.add_component(target, Position::new(0.0, 3.0));
        let projectile = spawn_projectile(&mut world, target, 5.0);

        world.update(0.1);

        let velocity = world.get_component::<Velocity>(projectile).unwrap();
        assert!(velocity.x.abs() < 1e-9);
        assert!((velocity.y - 2.0).abs() < 1e-9);
        let lifetime = world.get_component::<Projectile>(projectile).unwrap().lifetime;
        assert!((lifetime - 4.9).abs() < 1e-9);
    }

    #[test]
    fn test_keeps_heading_when_target_is_gone() {
        let mut world = World::new();
        world.add_system(ProjectileSystem::new());
        let target = world.create_entity();
        world.add_component(target, Position::new(0.0, 3.0));
        let projectile = spawn_projectile(&mut world, target, 5.0);
        world.remove_entity(target);

        world.update(0.1);
        assert_eq!(
            world.get_component::<Velocity>(projectile),
            Some(&Velocity { x: 2.0, y: 0.0 })
        );
    }

    #[test]
    fn test_expired_projectile_is_removed() {
        let mut world = World::new();
        world.add_system(ProjectileSystem::new());
        let target = world.create_entity();
        let projectile = spawn_projectile(&mut world, target, 0.25);

        world.update(0.2);
        assert!(world.is_alive(projectile));

        world.update(0.2);
        assert!(!world.is_alive(projectile));
        assert_eq!(world.components().component_count(projectile), 0);
    }
}
