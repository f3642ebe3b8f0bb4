//! Component buckets keyed by entity

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::Entity;

/// Trait for components
pub trait Component: 'static {}

/// Runtime tag for a component kind, used to build multi-kind queries.
#[derive(Clone, Copy)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
}

impl ComponentType {
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentType {}

impl Hash for ComponentType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type-erased component storage
pub trait ComponentStorage {
    fn component_type(&self) -> ComponentType;
    fn remove(&mut self, entity: Entity) -> bool;
    fn has(&self, entity: Entity) -> bool;
    fn entities(&self) -> Box<dyn Iterator<Item = Entity> + '_>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Concrete storage for a specific component type
pub struct TypedComponentStorage<T: Component> {
    data: HashMap<Entity, T>,
}

impl<T: Component> TypedComponentStorage<T> {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        self.data.insert(entity, component)
    }

    pub fn take(&mut self, entity: Entity) -> Option<T> {
        self.data.remove(&entity)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.data.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.data.get_mut(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.data.iter().map(|(entity, comp)| (*entity, comp))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.data.iter_mut().map(|(entity, comp)| (*entity, comp))
    }
}

impl<T: Component> Default for TypedComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage for TypedComponentStorage<T> {
    fn component_type(&self) -> ComponentType {
        ComponentType::of::<T>()
    }

    fn remove(&mut self, entity: Entity) -> bool {
        self.data.remove(&entity).is_some()
    }

    fn has(&self, entity: Entity) -> bool {
        self.data.contains_key(&entity)
    }

    fn entities(&self) -> Box<dyn Iterator<Item = Entity> + '_> {
        Box::new(self.data.keys().copied())
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
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

    #[derive(Debug)]
    struct Velocity;
    impl Component for Velocity {}

    fn entity(index: u64) -> Entity {
        Entity::new(index, 0)
    }

    #[test]
    fn test_component_storage() {
        let mut storage = TypedComponentStorage::<Position>::new();

        storage.insert(entity(1), Position { x: 1.0, y: 2.0 });
        storage.insert(entity(2), Position { x: 3.0, y: 4.0 });

        assert_eq!(storage.len(), 2);
        assert!(storage.has(entity(1)));
        assert!(storage.has(entity(2)));
        assert!(!storage.has(entity(3)));

        let pos = storage.get(entity(1)).unwrap();
        assert_eq!(pos.x, 1.0);
        assert_eq!(pos.y, 2.0);

        assert!(storage.remove(entity(1)));
        assert!(!storage.remove(entity(1)));
        assert!(!storage.has(entity(1)));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut storage = TypedComponentStorage::<Position>::new();

        assert!(storage.insert(entity(1), Position { x: 1.0, y: 1.0 }).is_none());
        let previous = storage.insert(entity(1), Position { x: 5.0, y: 5.0 });

        assert_eq!(previous, Some(Position { x: 1.0, y: 1.0 }));
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(entity(1)), Some(&Position { x: 5.0, y: 5.0 }));
    }

    #[test]
    fn test_generation_is_part_of_key() {
        let mut storage = TypedComponentStorage::<Position>::new();
        storage.insert(Entity::new(1, 0), Position { x: 0.0, y: 0.0 });

        assert!(!storage.has(Entity::new(1, 1)));
    }

    #[test]
    fn test_component_iteration() {
        let mut storage = TypedComponentStorage::<Position>::new();

        storage.insert(entity(1), Position { x: 1.0, y: 2.0 });
        storage.insert(entity(2), Position { x: 3.0, y: 4.0 });

        assert_eq!(storage.iter().count(), 2);

        for (_entity, pos) in storage.iter_mut() {
            pos.x += 1.0;
        }

        assert_eq!(storage.get(entity(1)).unwrap().x, 2.0);
    }

    #[test]
    fn test_component_type_identity() {
        assert_eq!(ComponentType::of::<Position>(), ComponentType::of::<Position>());
        assert_ne!(ComponentType::of::<Position>(), ComponentType::of::<Velocity>());
        assert!(ComponentType::of::<Velocity>().name().ends_with("Velocity"));
    }
}
