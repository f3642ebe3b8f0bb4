use tracing::debug;

use crate::{
    config::DemoConfig,
    demo::components::{BoundingBox, Enemy, Health, Position, Projectile, Tower, Velocity},
    ecs::{ComponentType, Entity, System, World},
};

use super::projectile::aim;

const PROJECTILE_SIZE: f64 = 0.5;

/// Charges every tower and, once a tower is ready, fires a projectile at the
/// nearest living enemy within its range.
///
/// A ready tower with nothing in range holds its charge and fires as soon as a
/// target shows up.
pub struct TowerFireSystem {
    projectile_speed: f64,
    projectile_lifetime: f64,
    fired: u64,
}

impl TowerFireSystem {
    pub fn new(config: &DemoConfig) -> Self {
        Self {
            projectile_speed: config.projectile_speed,
            projectile_lifetime: config.projectile_lifetime,
            fired: 0,
        }
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }
}

fn nearest_in_range(
    origin: Position,
    range: f64,
    enemies: &[(Entity, Position)],
) -> Option<(Entity, Position)> {
    enemies
        .iter()
        .filter(|(_, at)| origin.distance(*at) <= range)
        .min_by(|(_, a), (_, b)| origin.distance(*a).total_cmp(&origin.distance(*b)))
        .copied()
}

impl System for TowerFireSystem {
    fn name(&self) -> &str {
        "tower_fire"
    }

    fn update(&mut self, world: &mut World, dt: f64) {
        let enemies: Vec<(Entity, Position)> = world
            .entities_with_all(&[
                ComponentType::of::<Enemy>(),
                ComponentType::of::<Health>(),
                ComponentType::of::<Position>(),
            ])
            .into_iter()
            .filter_map(|enemy| {
                world
                    .get_component::<Position>(enemy)
                    .map(|at| (enemy, *at))
            })
            .collect();
        let towers = world.entities_with_all(&[
            ComponentType::of::<Tower>(),
            ComponentType::of::<Position>(),
        ]);

        for tower_entity in towers {
            let (Some(mut tower), Some(origin)) = (
                world.get_component::<Tower>(tower_entity).copied(),
                world.get_component::<Position>(tower_entity).copied(),
            ) else {
                continue;
            };
            tower.charge += dt;
            let target = if tower.charge >= tower.cooldown {
                nearest_in_range(origin, tower.range, &enemies)
            } else {
                None
            };

            match target {
                Some((target, at)) => {
                    tower.charge -= tower.cooldown;
                    let projectile = world.create_entity();
                    world.add_component(
                        projectile,
                        Projectile {
                            damage: tower.damage,
                            speed: self.projectile_speed,
                            target,
                            lifetime: self.projectile_lifetime,
                        },
                    );
                    world.add_component(projectile, origin);
                    world.add_component(projectile, BoundingBox::square(PROJECTILE_SIZE));
                    world.add_component::<Velocity>(
                        projectile,
                        aim(origin, at, self.projectile_speed),
                    );
                    self.fired += 1;
                    debug!(tower = %tower_entity, %target, %projectile, "tower fired");
                }
                None => tower.charge = tower.charge.min(tower.cooldown),
            }
            if let Some(stored) = world.get_component_mut::<Tower>(tower_entity) {
                *stored = tower;
            }
        }
    }
}
