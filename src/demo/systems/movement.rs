use crate::{
    demo::components::{Position, Velocity},
    ecs::{ComponentType, System, World},
};

/// Integrates `Velocity` into `Position`.
pub struct MovementSystem;

impl MovementSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn update(&mut self, world: &mut World, dt: f64) {
        let movers = world.entities_with_all(&[
            ComponentType::of::<Position>(),
            ComponentType::of::<Velocity>(),
        ]);
        for entity in movers {
            let Some(velocity) = world.get_component::<Velocity>(entity).copied() else {
                continue;
            };
            if let Some(position) = world.get_component_mut::<Position>(entity) {
                position.x += velocity.x * dt;
                position.y += velocity.y * dt;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_velocity() {
        let mut world = World::new();
        world.add_system(MovementSystem::new());
        let mover = world.create_entity();
        world.add_component(mover, Position::new(0.0, 0.0));
        world.add_component(mover, Velocity { x: 1.0, y: 0.0 });

        world.update(1.0);
        assert_eq!(world.get_component::<Position>(mover), Some(&Position::new(1.0, 0.0)));

        world.update(0.5);
        assert_eq!(world.get_component::<Position>(mover), Some(&Position::new(1.5, 0.0)));
    }

    #[test]
    fn test_entities_without_velocity_stay_put() {
        let mut world = World::new();
        world.add_system(MovementSystem::new());
        let statue = world.create_entity();
        world.add_component(statue, Position::new(3.0, 4.0));

        world.update(1.0);
        assert_eq!(world.get_component::<Position>(statue), Some(&Position::new(3.0, 4.0)));
    }
}
