//! Component manager - typed buckets plus the set-intersection query engine

use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Component, ComponentStorage, ComponentType, Entity, TypedComponentStorage};

/// How writes to a kind that was never registered are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentSchemaPolicy {
    /// Register on first write without comment.
    #[default]
    Implicit,
    /// Register on first write, but warn: the kind should have been in the schema.
    Strict,
}

pub struct ComponentManager {
    storages: HashMap<TypeId, Box<dyn ComponentStorage>>,
    schema: ComponentSchemaPolicy,
}

impl ComponentManager {
    pub fn new() -> Self {
        Self::with_schema_policy(ComponentSchemaPolicy::default())
    }

    pub fn with_schema_policy(schema: ComponentSchemaPolicy) -> Self {
        Self {
            storages: HashMap::new(),
            schema,
        }
    }

    /// Ensure a bucket exists for `T`. Registering twice is a no-op.
    pub fn register_component<T: Component>(&mut self) {
        self.storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(TypedComponentStorage::<T>::new()));
    }

    pub fn is_registered(&self, component_type: ComponentType) -> bool {
        self.storages.contains_key(&component_type.type_id())
    }

    pub fn registered_types(&self) -> Vec<ComponentType> {
        self.storages
            .values()
            .map(|storage| storage.component_type())
            .collect()
    }

    /// Insert or overwrite `entity`'s `T`, returning the value it replaced.
    ///
    /// Liveness of `entity` is not checked.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Option<T> {
        if !self.storages.contains_key(&TypeId::of::<T>())
            && self.schema == ComponentSchemaPolicy::Strict
        {
            warn!(
                component = std::any::type_name::<T>(),
                %entity,
                "component kind registered implicitly on first write"
            );
        }
        self.register_component::<T>();
        self.storage_mut::<T>()?.insert(entity, component)
    }

    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.take(entity)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.has_component_type(entity, ComponentType::of::<T>())
    }

    pub fn has_component_type(&self, entity: Entity, component_type: ComponentType) -> bool {
        self.storages
            .get(&component_type.type_id())
            .is_some_and(|storage| storage.has(entity))
    }

    pub fn entities_with<T: Component>(&self) -> BTreeSet<Entity> {
        self.entities_with_type(ComponentType::of::<T>())
    }

    pub fn entities_with_type(&self, component_type: ComponentType) -> BTreeSet<Entity> {
        self.storages
            .get(&component_type.type_id())
            .map(|storage| storage.entities().collect())
            .unwrap_or_default()
    }

    /// Entities holding a component of every kind in `types`.
    ///
    /// An empty list matches nothing. A kind without a bucket matches nothing.
    pub fn entities_with_all(&self, types: &[ComponentType]) -> BTreeSet<Entity> {
        if types.is_empty() {
            return BTreeSet::new();
        }
        let mut buckets: Vec<&dyn ComponentStorage> = Vec::with_capacity(types.len());
        for component_type in types {
            match self.storages.get(&component_type.type_id()) {
                Some(storage) => buckets.push(&**storage),
                None => return BTreeSet::new(),
            }
        }
        buckets.sort_by_key(|storage| storage.len());
        let (smallest, rest) = buckets.split_at(1);
        smallest[0]
            .entities()
            .filter(|entity| rest.iter().all(|storage| storage.has(*entity)))
            .collect()
    }

    /// Drop `entity` from every bucket, returning how many components were removed.
    pub fn remove_all_components(&mut self, entity: Entity) -> usize {
        self.storages
            .values_mut()
            .map(|storage| storage.remove(entity))
            .filter(|removed| *removed)
            .count()
    }

    /// Number of components stored for `entity` across all buckets.
    pub fn component_count(&self, entity: Entity) -> usize {
        self.storages
            .values()
            .filter(|storage| storage.has(entity))
            .count()
    }

    pub fn storage<T: Component>(&self) -> Option<&TypedComponentStorage<T>> {
        self.storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<TypedComponentStorage<T>>()
    }

    pub fn storage_mut<T: Component>(&mut self) -> Option<&mut TypedComponentStorage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<TypedComponentStorage<T>>()
    }
}

impl Default for ComponentManager {
    fn default() -> Self {
        Self::new()
    }
}
