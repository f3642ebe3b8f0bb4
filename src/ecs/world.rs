//! World - central ECS container and frame protocol

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::{debug, trace, warn};

use super::event::{EventBus, EventPassReport};
use super::{
    AsAny, CascadePolicy, Component, ComponentManager, ComponentType, Entity, EntityManager,
    Event, System, SystemRunReport,
};
use crate::config::WorldConfig;
use crate::error::EcsError;

/// What happened during one [`World::update`].
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub frame: u64,
    pub delta_seconds: f64,
    pub system_reports: Vec<SystemRunReport>,
    pub events: EventPassReport,
}

/// World holds all entities, components, systems and the event queue
pub struct World {
    entities: EntityManager,
    components: ComponentManager,
    systems: Vec<Box<dyn System>>,
    events: EventBus,
    frame: u64,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(&WorldConfig::default())
    }

    pub fn with_config(config: &WorldConfig) -> Self {
        Self {
            entities: EntityManager::with_policy(config.entity_ids),
            components: ComponentManager::with_schema_policy(config.component_schema),
            systems: Vec::new(),
            events: EventBus::new(config.event_cascade, config.max_event_passes),
            frame: 0,
        }
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn components(&self) -> &ComponentManager {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentManager {
        &mut self.components
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Number of completed updates.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.create_entity();
        debug!(%entity, "entity created");
        entity
    }

    pub fn try_create_entity(&mut self) -> Result<Entity, EcsError> {
        let entity = self.entities.try_create_entity()?;
        debug!(%entity, "entity created");
        Ok(entity)
    }

    /// Evict an entity from the live set and strip every component it holds.
    ///
    /// Components are stripped even when the handle is no longer live.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        let was_alive = self.entities.remove_entity(entity);
        let stripped = self.components.remove_all_components(entity);
        debug!(%entity, was_alive, stripped, "entity removed");
        was_alive
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.has_entity(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    pub fn register_component<T: Component>(&mut self) {
        self.components.register_component::<T>();
    }

    /// Add a component to an entity, returning the one it replaced.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Option<T> {
        self.components.add_component(entity, component)
    }

    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.components.remove_component::<T>(entity)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.components.get_component::<T>(entity)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.get_component_mut::<T>(entity)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components.has_component::<T>(entity)
    }

    pub fn entities_with<T: Component>(&self) -> BTreeSet<Entity> {
        self.components.entities_with::<T>()
    }

    pub fn entities_with_all(&self, types: &[ComponentType]) -> BTreeSet<Entity> {
        self.components.entities_with_all(types)
    }

    /// The one entity carrying every kind in `types`.
    pub fn single(&self, types: &[ComponentType]) -> Result<Entity, EcsError> {
        let matches = self.components.entities_with_all(types);
        let kinds = || {
            types
                .iter()
                .map(ComponentType::name)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut iter = matches.iter();
        match (iter.next(), iter.next()) {
            (Some(entity), None) => Ok(*entity),
            (None, _) => Err(EcsError::SingletonMissing { kinds: kinds() }),
            (Some(_), Some(_)) => Err(EcsError::SingletonAmbiguous {
                kinds: kinds(),
                count: matches.len(),
            }),
        }
    }

    pub fn single_with<T: Component>(&self) -> Result<Entity, EcsError> {
        self.single(&[ComponentType::of::<T>()])
    }

    /// Append a system; registration order is execution order.
    pub fn add_system(&mut self, system: impl System) {
        self.systems.push(Box::new(system));
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn system_names(&self) -> Vec<String> {
        self.systems.iter().map(|s| s.name().to_string()).collect()
    }

    /// Registered system of type `T`. Always `None` while an update is running.
    pub fn get_system<T: System>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|system| (**system).as_any().downcast_ref::<T>())
    }

    pub fn register_event_handler<E, F>(&mut self, handler: F)
    where
        E: Event,
        F: FnMut(&mut World, &E) + 'static,
    {
        self.events.subscribe(handler);
    }

    pub fn queue_event<E: Event>(&mut self, event: E) {
        trace!(event = ?event, "event queued");
        self.events.queue(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.pending()
    }

    /// Run one frame: every system in order, then the event queue.
    pub fn update(&mut self, dt: f64) -> FrameReport {
        let mut systems = std::mem::take(&mut self.systems);
        let mut system_reports = Vec::with_capacity(systems.len());
        for system in systems.iter_mut() {
            let start = Instant::now();
            system.update(self, dt);
            system_reports.push(SystemRunReport {
                name: system.name().to_string(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
        }
        // Systems added mid-frame run from the next frame on.
        systems.append(&mut self.systems);
        self.systems = systems;

        let events = self.process_events();
        self.frame += 1;
        trace!(frame = self.frame, dt, dispatched = events.dispatched, "frame complete");

        FrameReport {
            frame: self.frame,
            delta_seconds: dt,
            system_reports,
            events,
        }
    }

    fn process_events(&mut self) -> EventPassReport {
        let mut report = EventPassReport::default();
        if self.events.queue.is_empty() {
            return report;
        }

        let mut handlers = std::mem::take(&mut self.events.handlers);
        loop {
            let batch = std::mem::take(&mut self.events.queue);
            report.passes += 1;
            for record in &batch {
                match handlers.get_mut(&record.event_type()) {
                    Some(list) => {
                        for handler in list.iter_mut() {
                            handler(self, record);
                        }
                    }
                    None => trace!(event = record.event_type().name(), "no handler registered"),
                }
                report.dispatched += 1;
            }

            let cascaded = self.events.queue.len();
            if cascaded == 0 {
                break;
            }
            match self.events.policy() {
                CascadePolicy::SamePass if report.passes < self.events.max_passes() => continue,
                CascadePolicy::SamePass => {
                    warn!(
                        deferred = cascaded,
                        passes = report.passes,
                        "event cascade hit the pass limit; deferring the rest to next frame"
                    );
                    report.deferred = cascaded;
                }
                CascadePolicy::NextFrame => {
                    debug!(deferred = cascaded, "cascaded events deferred to next frame");
                    report.deferred = cascaded;
                }
                CascadePolicy::Drop => {
                    warn!(dropped = cascaded, "cascaded events dropped");
                    self.events.queue.clear();
                    report.dropped = cascaded;
                }
            }
            break;
        }
        self.events.restore_handlers(handlers);
        report
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles a world before its first frame: schema, systems, handlers.
pub struct WorldBuilder {
    world: World,
}

impl WorldBuilder {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            world: World::with_config(config),
        }
    }

    pub fn register_component<T: Component>(mut self) -> Self {
        self.world.register_component::<T>();
        self
    }

    pub fn with_system(mut self, system: impl System) -> Self {
        self.world.add_system(system);
        self
    }

    pub fn push_system(&mut self, system: impl System) {
        self.world.add_system(system);
    }

    pub fn with_handler<E, F>(mut self, handler: F) -> Self
    where
        E: Event,
        F: FnMut(&mut World, &E) + 'static,
    {
        self.world.register_event_handler(handler);
        self
    }

    pub fn build(self) -> World {
        self.world
    }
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new(&WorldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }
    impl Component for Velocity {}

    struct Player;
    impl Component for Player {}

    struct CountingSystem {
        calls: u32,
    }

    impl System for CountingSystem {
        fn name(&self) -> &str {
            "counting"
        }

        fn update(&mut self, _world: &mut World, _dt: f64) {
            self.calls += 1;
        }
    }

    #[test]
    fn test_world_entity_lifecycle() {
        let mut world = World::new();

        let e1 = world.create_entity();
        let e2 = world.create_entity();

        assert!(world.is_alive(e1));
        assert!(world.is_alive(e2));
        assert_eq!(world.entity_count(), 2);

        assert!(world.remove_entity(e1));
        assert!(!world.is_alive(e1));
        assert!(world.is_alive(e2));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_world_components() {
        let mut world = World::new();

        let entity = world.create_entity();
        world.add_component(entity, Position { x: 1.0, y: 2.0 });
        world.add_component(entity, Velocity { dx: 0.5, dy: 0.5 });

        assert!(world.has_component::<Position>(entity));
        assert!(world.has_component::<Velocity>(entity));

        let pos = world.get_component::<Position>(entity).unwrap();
        assert_eq!(pos.x, 1.0);

        if let Some(vel) = world.get_component_mut::<Velocity>(entity) {
            vel.dx = 1.0;
        }

        let vel = world.get_component::<Velocity>(entity).unwrap();
        assert_eq!(vel.dx, 1.0);
    }

    #[test]
    fn test_remove_entity_strips_components() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, Position { x: 0.0, y: 0.0 });
        world.add_component(entity, Velocity { dx: 0.0, dy: 0.0 });

        world.remove_entity(entity);

        assert_eq!(world.components().component_count(entity), 0);
        assert!(world.entities_with::<Position>().is_empty());
        assert!(!world.remove_entity(entity));
    }

    #[test]
    fn test_single_lookup() {
        let mut world = World::new();
        assert!(matches!(
            world.single_with::<Player>(),
            Err(EcsError::SingletonMissing { .. })
        ));

        let player = world.create_entity();
        world.add_component(player, Player);
        assert_eq!(world.single_with::<Player>(), Ok(player));

        let imposter = world.create_entity();
        world.add_component(imposter, Player);
        assert_eq!(
            world.single_with::<Player>(),
            Err(EcsError::SingletonAmbiguous {
                kinds: std::any::type_name::<Player>().to_string(),
                count: 2,
            })
        );
    }

    #[test]
    fn test_update_counts_frames_and_reports_systems() {
        let mut world = WorldBuilder::default()
            .with_system(CountingSystem { calls: 0 })
            .build();

        let report = world.update(0.25);
        world.update(0.25);

        assert_eq!(report.frame, 1);
        assert_eq!(report.delta_seconds, 0.25);
        assert_eq!(report.system_reports.len(), 1);
        assert_eq!(report.system_reports[0].name, "counting");
        assert_eq!(world.frame(), 2);
        assert_eq!(world.get_system::<CountingSystem>().unwrap().calls, 2);
        assert_eq!(world.system_names(), vec!["counting".to_string()]);
    }

    #[test]
    fn test_system_added_mid_frame_runs_next_frame() {
        struct Spawner {
            done: bool,
        }
        impl System for Spawner {
            fn name(&self) -> &str {
                "spawner"
            }
            fn update(&mut self, world: &mut World, _dt: f64) {
                if !self.done {
                    world.add_system(CountingSystem { calls: 0 });
                    self.done = true;
                }
            }
        }

        let mut world = World::new();
        world.add_system(Spawner { done: false });

        let first = world.update(1.0);
        assert_eq!(first.system_reports.len(), 1);
        assert_eq!(world.system_count(), 2);

        world.update(1.0);
        assert_eq!(world.get_system::<CountingSystem>().unwrap().calls, 1);
    }
}
